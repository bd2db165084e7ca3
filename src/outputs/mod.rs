//! Output generation for the card files consumed by the app.
//!
//! # Submodules
//!
//! - [`json`]: per-topic card files and the aggregate card file
//! - [`summary`]: the run summary with per-topic counts
//!
//! # Output structure
//!
//! ```text
//! output_dir/
//! ├── sleep.json          # cards for one topic (array of Card)
//! ├── tantrums.json
//! ├── all_cards.json      # every card from this run
//! └── run_summary.json    # topic → counts, timestamp
//! ```
//!
//! All writes are full overwrites: a re-run supersedes a topic's file
//! wholesale, never appends or merges.

pub mod json;
pub mod summary;
