//! Hand-authored fallback card sets, keyed by topic id.
//!
//! These templates are the pipeline's safety net: whatever happens to the
//! AI endpoint or the source sites, every configured topic can always be
//! answered with at least one card of 3-5 tips. Topics without a dedicated
//! set get the generic default set.

use crate::models::TipSet;

fn card(title: &str, subtitle: &str, tips: &[&str]) -> TipSet {
    TipSet {
        title: title.to_string(),
        subtitle: subtitle.to_string(),
        tips: tips.iter().map(|t| t.to_string()).collect(),
        age_groups: Vec::new(),
    }
}

/// Template card sets for a topic id, falling back to the generic set.
pub fn template_tip_sets(topic_id: &str) -> Vec<TipSet> {
    match topic_id {
        "tantrums" => vec![
            card(
                "Stay Calm First",
                "Your calm is their anchor during a storm",
                &[
                    "Take three slow breaths before you respond to an outburst. The pause keeps you responding instead of reacting, and your steadiness is what eventually settles your child.",
                    "Come down to their eye level and use a quiet, unhurried voice. Standing over an upset child reads as threat; kneeling beside them reads as safety.",
                    "Remind yourself that they are not giving you a hard time, they are having one. A melted-down brain cannot process logic, so save the lesson for later.",
                    "Keep your face and shoulders soft. Children read your body long before they hear your words.",
                    "If you feel your own temper rising, it is fine to say you need a moment and step back briefly. Showing how you regulate teaches the very skill you want them to learn.",
                ],
            ),
            card(
                "Prevent the Next Storm",
                "Most meltdowns are hunger, tiredness, or surprise",
                &[
                    "Watch for the classic triggers: hunger, fatigue, and overstimulation. A snack and a quiet ten minutes head off more tantrums than any discipline technique.",
                    "Give transition warnings, such as five more minutes at the playground. Sudden changes are what young children struggle with most.",
                    "Keep daily routines predictable so your child always knows what comes next. Predictability feels like safety.",
                    "Offer small choices, like the red cup or the blue cup. A child with some control over little things fights less for control over big ones.",
                    "Plan errands around rest and meals rather than through them. Setting your child up to succeed beats managing the fallout.",
                ],
            ),
        ],
        "sleep" => vec![
            card(
                "Build a Bedtime Routine",
                "Predictability tells the brain sleep is coming",
                &[
                    "Start winding down 30 to 60 minutes before lights out, with the same steps in the same order every night: bath, pajamas, teeth, story, song.",
                    "Keep the last hour screen free. The light from devices delays the sleep hormone your child's body is trying to produce.",
                    "Fold in a few minutes of one-on-one connection, like talking about the day or a short cuddle. Feeling close makes it easier to separate for the night.",
                    "Hold the same schedule on weekends. More than an hour of drift can unsettle sleep for days afterward.",
                    "Finish the routine in the child's own bed, awake. Falling asleep where they will wake up helps them resettle on their own at night.",
                ],
            ),
            card(
                "Handle Night Wakings",
                "Everyone wakes at night; the skill is falling back asleep",
                &[
                    "Keep night-time interactions brief and boring: soft voice, dim light, minimal conversation. You want to reassure without making 2 a.m. visits rewarding.",
                    "If your child comes to your room, walk them back calmly and consistently, even when it takes several trips. Consistency is the lesson.",
                    "Check the basics once — too hot, too cold, thirsty, scared — then return to the sleep expectation without fuss.",
                    "Avoid starting habits you do not want to keep, like lying with them until they fall asleep. Whatever helps them fall asleep at bedtime is what they will need again at 2 a.m.",
                    "A wake-up clock that changes color in the morning gives young children a concrete rule for when getting up is allowed.",
                ],
            ),
        ],
        "eating_habits" => vec![
            card(
                "Share the Job at Mealtimes",
                "You decide what is served; they decide how much",
                &[
                    "Take charge of what food is offered and when, and let your child decide whether and how much to eat. This division prevents most food battles.",
                    "Serve meals and snacks at regular times so your child arrives at the table hungry but not frantic.",
                    "Put at least one food they already like on the table alongside anything new, so there is always a safe landing.",
                    "Trust their fullness cues instead of pushing a clean plate. Children are born knowing how much they need.",
                    "Resist becoming a short-order cook. One family meal, take it or leave it, with the next meal never far away.",
                ],
            ),
            card(
                "Win Over a Picky Eater",
                "Selectivity is normal and usually temporary",
                &[
                    "Expect ten or more relaxed exposures before a new food is accepted, and keep offering without pressure.",
                    "Count touching, smelling, or licking a food as progress. Every interaction moves a new food closer to being eaten.",
                    "Skip the label. A child who hears they are a picky eater will live up to it; try saying they are still learning about new foods.",
                    "Let your child help wash, tear, and stir. Children eat what they helped make.",
                    "Keep dessert out of the bargaining. Using sweets as a reward teaches that vegetables are the price and sugar is the prize.",
                ],
            ),
        ],
        "screen_time" => vec![
            card(
                "Quality Over Quantity",
                "Not all screen time is created equal",
                &[
                    "Treat a video call with grandma, a drawing app, and an autoplay cartoon marathon as three different things, because they are.",
                    "Watch together when you can and talk about what you see. Co-viewing turns passive watching into conversation.",
                    "Preview new shows and games before your child sees them; age ratings only tell part of the story.",
                    "Nudge toward making over watching: building, recording, drawing. Creation engages far more of a growing brain.",
                    "Talk early and often about how videos are edited and ads are designed. Media literacy starts in preschool.",
                ],
            ),
            card(
                "Boundaries Without Battles",
                "Clear rules prevent daily negotiation",
                &[
                    "Agree on when screens are allowed and for how long, and use a visible timer so the end is never a surprise.",
                    "Keep bedrooms, the dinner table, and the hour before bed screen free for everyone, parents included.",
                    "Have a boredom basket ready: blocks, crayons, a puzzle. Most screen requests are really boredom requests.",
                    "Notice your own scrolling. Children learn their screen habits by watching yours.",
                    "Keep screens from becoming the default soother or the standing reward; they gain too much power that way.",
                ],
            ),
        ],
        "behavior" => vec![
            card(
                "Connection Before Correction",
                "Children behave better when they feel understood",
                &[
                    "Get on their level, name what you see — you are really frustrated the tower fell — before addressing what they did.",
                    "Remember that all behavior is communication. Ask yourself what your child needs: sleep, food, attention, or a sense of control.",
                    "Invest ten focused one-on-one minutes a day. Connected children are cooperative children.",
                    "Stay calm during misbehavior; your settled nervous system is what settles theirs.",
                    "Reconnect with a hug or kind words after a correction, so your child knows the relationship survived the moment.",
                ],
            ),
            card(
                "Make Expectations Stick",
                "Children thrive inside predictable limits",
                &[
                    "Say what to do, not just what to stop: walking feet inside lands better than don't run.",
                    "Keep the rule list short. Three to five rules about safety and kindness are all a young child can hold.",
                    "Warn before transitions — five minutes until cleanup — so change never ambushes them.",
                    "Enforce the same limits today that you enforced yesterday. Inconsistency invites testing.",
                    "Let safe natural consequences do the teaching, then skip the I-told-you-so and simply empathize.",
                ],
            ),
        ],
        "separation_anxiety" => vec![card(
            "Goodbyes That Help",
            "How you leave matters as much as that you leave",
            &[
                "Keep goodbyes short, warm, and confident. Long farewells signal there is something to worry about.",
                "Never sneak away. It saves one hard moment and costs your child's trust in every departure after it.",
                "Build a goodbye ritual — a special handshake, three kisses, the same parting phrase — to give the moment a predictable shape.",
                "Say plainly when you will be back in child time: after snack, after nap. Then be back.",
                "Practice small separations with trusted people so the brave muscle grows before the big first day.",
            ],
        )],
        "social_skills" => vec![card(
            "Practice Through Play",
            "Friendship skills are learned by doing",
            &[
                "Start with one-on-one playdates; small is easier than a crowd for practicing sharing and turn-taking.",
                "Coach in the moment from nearby: Maya wants a turn — what could you say to her?",
                "Use pretend play to rehearse joining a game, losing gracefully, and making up after a squabble.",
                "Narrate social cues out loud: look at his face, does he like that game? Reading cues is a skill, not an instinct.",
                "Praise the attempt, not just the outcome. Asking to join is brave even when the answer is no.",
            ],
        )],
        "confidence" => vec![card(
            "Praise Effort, Not Results",
            "Build a growth mindset through your words",
            &[
                "Swap you're so smart for you worked so hard on that. Effort praise builds children who try difficult things.",
                "Be specific: I noticed you kept going when the puzzle got frustrating tells them exactly what to repeat.",
                "Let them struggle a little before you help, and ask first: do you want help or do you want to try?",
                "Treat mistakes as how brains grow, and mention your own now and then.",
                "Hand over real responsibilities — setting the table, feeding the cat — and accept imperfect results. Contribution builds capability.",
            ],
        )],
        "emotional_regulation" => vec![card(
            "Name It to Tame It",
            "Labeled feelings are manageable feelings",
            &[
                "Give feelings names in the moment: it looks like you might be disappointed we can't go to the park.",
                "Practice calming tools when everyone is calm — smell the flower, blow out the candle breathing — so they are there during the storm.",
                "Offer big feelings a physical outlet: running, jumping, squeezing playdough.",
                "Validate before you problem-solve. A feeling that is acknowledged passes faster than one that is argued with.",
                "Narrate your own regulation out loud — I'm frustrated, I'm going to take a slow breath — because they learn it by watching you.",
            ],
        )],
        "potty_training" => vec![card(
            "Follow Their Readiness",
            "There is no magic age, only readiness signs",
            &[
                "Wait for the signs: staying dry a couple of hours, interest in the bathroom, discomfort in a wet diaper.",
                "Build relaxed potty sits into the routine, after waking and after meals, and keep them pressure free.",
                "Celebrate successes warmly and treat accidents as part of learning, cleaned up without comment.",
                "Skip the constant do-you-need-to-go; it turns the toilet into a power struggle.",
                "Expect regression during big changes like a new sibling or a new school, and simply return to basics until it passes.",
            ],
        )],
        _ => default_tip_sets(),
    }
}

/// The generic set used for topics without dedicated templates.
pub fn default_tip_sets() -> Vec<TipSet> {
    vec![card(
        "Trust the Basics",
        "Steady, connected parenting covers most ground",
        &[
            "Every child develops at their own pace; observe yours and trust what you see over what the chart says.",
            "Stay patient and consistent. Children thrive on predictable, loving responses far more than on perfect ones.",
            "Celebrate small wins. Progress is rarely a straight line, and every step forward counts.",
            "Connect before you correct. A child who feels understood is a child who can listen.",
            "Expert advice is a guide, but you know your child best; your relationship is the foundation everything else rests on.",
        ],
    )]
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN_TOPICS: [&str; 9] = [
        "tantrums",
        "sleep",
        "eating_habits",
        "screen_time",
        "behavior",
        "separation_anxiety",
        "social_skills",
        "confidence",
        "emotional_regulation",
    ];

    #[test]
    fn test_every_template_card_has_three_to_five_tips() {
        for topic in KNOWN_TOPICS.iter().chain(["potty_training", "unknown"].iter()) {
            for set in template_tip_sets(topic) {
                assert!(
                    (3..=5).contains(&set.tips.len()),
                    "{topic}: card {:?} has {} tips",
                    set.title,
                    set.tips.len()
                );
                assert!(!set.title.is_empty());
                assert!(set.tips.iter().all(|t| !t.trim().is_empty()));
            }
        }
    }

    #[test]
    fn test_known_topic_gets_dedicated_set() {
        let sets = template_tip_sets("tantrums");
        assert!(sets.iter().any(|s| s.title == "Stay Calm First"));
    }

    #[test]
    fn test_unknown_topic_gets_default_set() {
        let sets = template_tip_sets("unknown_topic_xyz");
        assert_eq!(sets.len(), default_tip_sets().len());
        assert_eq!(sets[0].title, "Trust the Basics");
    }

    #[test]
    fn test_default_set_is_never_empty() {
        assert!(!default_tip_sets().is_empty());
    }
}
