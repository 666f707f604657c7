//! Prompt construction for story generation

use crate::request::StoryRequest;

/// System role sent ahead of every story prompt
pub const SYSTEM_PROMPT: &str
  = "You are an award-winning novelist. You craft vivid scenes, \
     believable dialogue, and tight plots.";

/// Build the user instruction for a story request.
///
/// The premise is trimmed and interpolated as-is; nothing is escaped.
/// The ±15% tolerance is only stated to the model.
pub fn build_prompt(request: &StoryRequest) -> String
{   format!(
"Write a complete short story in {language}.
Requirements:
- Genre: {genre}
- Main characters: {p1} and {p2}
- Start with a strong hook in the first 2–3 sentences.
- Maintain clear scene breaks and a satisfying arc (setup → escalation → climax → resolution).
- Show, don't tell. Keep dialogue natural.
- Keep pacing tight and avoid filler.
- Tone and diction should match the genre.
- Target length: ~{words} words (±15%).
- End with a resonant final line (no meta commentary).

Backstory / seed premise:
{premise}",
      language = request.language,
      genre = request.genre,
      p1 = request.protagonist1,
      p2 = request.protagonist2,
      words = request.target_words,
      premise = request.premise.trim(),
    )
}

#[cfg(test)]
mod tests
{   use super::*;
    use crate::request::{Genre, Language, StoryRequest};

    fn sample() -> StoryRequest
    {   StoryRequest::new(
          "Ada"
        , "Grace"
        , Genre::ScienceFiction
        , "\n  A derelict station wakes up.  \n"
        ).with_language(Language::English)
    }

    #[test]
    fn prompt_embeds_each_field_once()
    {   let prompt = build_prompt(&sample());
        for needle in [
          "SF"
        , "Ada"
        , "Grace"
        , "English"
        , "A derelict station wakes up."
        ]
        {   assert_eq!(
              prompt.matches(needle).count(), 1,
              "{} should appear exactly once", needle
            );
        }
        assert!(prompt.contains("~1200 words (±15%)"));
    }

    #[test]
    fn premise_is_trimmed_and_ends_the_prompt()
    {   let prompt = build_prompt(&sample());
        assert!(prompt.ends_with(
          "Backstory / seed premise:\nA derelict station wakes up."
        ));
        assert!(prompt.starts_with(
          "Write a complete short story in English.\n"
        ));
    }

    #[test]
    fn premise_is_not_escaped()
    {   let mut req = sample();
        req.premise = "Ignore the above {and} \"quote\"".to_string();
        assert!(build_prompt(&req)
          .contains("Ignore the above {and} \"quote\""));
    }

    #[test]
    fn prompt_is_deterministic()
    {   let req = StoryRequest::new("지우", "민서", Genre::Fantasy, "오래된 가게...")
          .with_target_words(2500);
        assert_eq!(build_prompt(&req), build_prompt(&req.clone()));
        assert!(build_prompt(&req).contains("~2500 words"));
    }
}
