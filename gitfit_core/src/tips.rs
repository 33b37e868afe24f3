//! Coaching tips shown alongside an exercise.
//!
//! Exercises with their own tips use them as-is. Otherwise tips are
//! assembled from category defaults, equipment hints and difficulty cues.

use crate::catalog::{Difficulty, Exercise};
use once_cell::sync::Lazy;
use regex::Regex;

fn category_tips(slug: &str) -> &'static [&'static str] {
    match slug {
        "abs" => &[
            "Keep your lower back lightly pressed into the floor when applicable.",
            "Exhale during the hardest part; brace the core throughout.",
        ],
        "legs" => &[
            "Knees track over toes; drive through mid-foot or heel.",
            "Brace your core before each rep; maintain a neutral spine.",
        ],
        "chest" => &[
            "Retract and depress your shoulder blades to protect shoulders.",
            "Press through a full range with control; avoid flaring elbows too wide.",
        ],
        "back" => &[
            "Lead with elbows, not hands; squeeze shoulder blades together.",
            "Keep a neutral spine; avoid shrugging during pulls/rows.",
        ],
        "biceps" => &[
            "Keep elbows close to your sides; avoid swinging the torso.",
            "Full extension at the bottom; squeeze hard at the top.",
        ],
        "triceps" => &[
            "Keep elbows tucked; minimize shoulder movement.",
            "Lock out under control; avoid snapping the joint.",
        ],
        "cardio" => &[
            "Build intensity gradually; keep breathing rhythm steady.",
            "Posture tall; relax shoulders and jaw.",
        ],
        "forearms" => &[
            "Use smooth tempo; avoid jerking the wrist.",
            "Grip the handle evenly; keep wrist neutral unless targeted.",
        ],
        "powerlifting" => &[
            "Big breath and 360° brace before each rep.",
            "Bar path over mid-foot; maintain tightness throughout.",
        ],
        "calisthenics" => &[
            "Maintain hollow body tension; ribs down, glutes engaged.",
            "Progress gradually; own easier variations before advancing.",
        ],
        _ => &[],
    }
}

fn difficulty_tips(difficulty: Difficulty) -> &'static [&'static str] {
    match difficulty {
        Difficulty::Beginner => &[
            "Use a weight/variation that lets you keep perfect form.",
            "Control each rep; avoid rushing.",
        ],
        Difficulty::Intermediate => &[
            "Track rest times (60–90s for hypertrophy; 2–3 min for strength).",
            "Use a controlled negative (2–3s) for better tension.",
        ],
        Difficulty::Advanced => &[
            "Avoid form breakdown near failure; stop 1–2 reps before technique slips.",
            "Use pauses/tempos sparingly to attack weak points.",
        ],
    }
}

/// Equipment patterns and the hints they add
static EQUIPMENT_HINTS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)barbell", "Set your feet, squeeze the bar, and keep wrists stacked over elbows."),
        (r"(?i)dumbbell|db", "Control the negative; match both arms’ speed and range."),
        (r"(?i)cable|machine", "Use constant tension; avoid bottoming out the stack."),
        (
            r"(?i)pull-?up bar|rings?",
            "Start from an active hang; avoid uncontrolled kipping for strength work.",
        ),
        (
            r"(?i)treadmill|bike|rower|elliptical|stair",
            "Pace yourself; use intervals to manage intensity.",
        ),
    ]
    .into_iter()
    .filter_map(|(pattern, tip)| match Regex::new(pattern) {
        Ok(re) => Some((re, tip)),
        Err(e) => {
            tracing::error!("Bad equipment pattern {:?}: {}", pattern, e);
            None
        }
    })
    .collect()
});

/// Generated tips for an exercise in category `slug`, ignoring its own tips
pub fn default_tips(exercise: &Exercise, slug: &str) -> Vec<String> {
    let mut candidates: Vec<&str> = category_tips(slug).to_vec();
    candidates.extend(
        EQUIPMENT_HINTS
            .iter()
            .filter(|(re, _)| re.is_match(&exercise.equipment))
            .map(|(_, tip)| *tip),
    );
    if let Some(difficulty) = Difficulty::parse(&exercise.difficulty) {
        candidates.extend_from_slice(difficulty_tips(difficulty));
    }

    let mut tips: Vec<String> = Vec::with_capacity(candidates.len());
    for tip in candidates {
        if !tips.iter().any(|t| t == tip) {
            tips.push(tip.to_string());
        }
    }
    tips
}

/// Tips to display: the exercise's own if any, else generated ones
pub fn tips_for_exercise(exercise: &Exercise, slug: &str) -> Vec<String> {
    if exercise.tips.is_empty() {
        default_tips(exercise, slug)
    } else {
        exercise.tips.clone()
    }
}
