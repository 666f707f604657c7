//! Story request types and their bounds

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

pub const TARGET_WORDS_RANGE: RangeInclusive<u32> = 400..=3000;
pub const DEFAULT_TARGET_WORDS: u32 = 1200;

pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 0.0..=1.5;
pub const DEFAULT_TEMPERATURE: f64 = 0.9;

/// Story genres offered by the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum Genre
{   #[default]
    #[serde(rename = "로맨스")]
    Romance
  , #[serde(rename = "미스터리")]
    Mystery
  , #[serde(rename = "스릴러")]
    Thriller
  , #[serde(rename = "판타지")]
    Fantasy
  , #[serde(rename = "SF")]
    ScienceFiction
  , #[serde(rename = "호러")]
    Horror
  , #[serde(rename = "성장소설")]
    ComingOfAge
  , #[serde(rename = "휴먼드라마")]
    HumanDrama
  , #[serde(rename = "코미디")]
    Comedy
  , #[serde(rename = "사극/역사")]
    Historical
}

impl Genre
{   pub const ALL: [Genre; 10] = [
      Genre::Romance
    , Genre::Mystery
    , Genre::Thriller
    , Genre::Fantasy
    , Genre::ScienceFiction
    , Genre::Horror
    , Genre::ComingOfAge
    , Genre::HumanDrama
    , Genre::Comedy
    , Genre::Historical
    ];

    /// Label shown to the user and embedded in the prompt
    pub fn label(&self) -> &'static str
    {   match self
        {   Genre::Romance => "로맨스"
          , Genre::Mystery => "미스터리"
          , Genre::Thriller => "스릴러"
          , Genre::Fantasy => "판타지"
          , Genre::ScienceFiction => "SF"
          , Genre::Horror => "호러"
          , Genre::ComingOfAge => "성장소설"
          , Genre::HumanDrama => "휴먼드라마"
          , Genre::Comedy => "코미디"
          , Genre::Historical => "사극/역사"
        }
    }
}

/// Output language of the story
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum Language
{   #[default]
    #[serde(rename = "한국어")]
    Korean
  , #[serde(rename = "English")]
    English
}

impl Language
{   pub const ALL: [Language; 2] = [Language::Korean, Language::English];

    pub fn label(&self) -> &'static str
    {   match self
        {   Language::Korean => "한국어"
          , Language::English => "English"
        }
    }
}

/// Chat models the form lets the user pick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum ChatModel
{   #[default]
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini
  , #[serde(rename = "gpt-4o")]
    Gpt4o
}

impl ChatModel
{   pub const ALL: [ChatModel; 2] = [ChatModel::Gpt4oMini, ChatModel::Gpt4o];

    /// Model identifier sent to the API
    pub fn label(&self) -> &'static str
    {   match self
        {   ChatModel::Gpt4oMini => "gpt-4o-mini"
          , ChatModel::Gpt4o => "gpt-4o"
        }
    }
}

macro_rules! label_conversions
{   ($ty:ident, $what:literal) => {
      impl fmt::Display for $ty
      {   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
          {   f.write_str(self.label())
          }
      }

      impl FromStr for $ty
      {   type Err = crate::error::Error;

          fn from_str(s: &str) -> Result<Self, Self::Err>
          {   let wanted = s.trim();
              $ty::ALL
                .iter()
                .copied()
                .find(|v| v.label() == wanted)
                .ok_or_else(|| {
                  let known: Vec<&str>
                    = $ty::ALL.iter().map(|v| v.label()).collect();
                  crate::error::Error::InvalidRequest(format!(
                    "unknown {} '{}' (expected one of: {})",
                    $what, wanted, known.join(", ")
                  ))
                })
          }
      }
    };
}

label_conversions!(Genre, "genre");
label_conversions!(Language, "language");
label_conversions!(ChatModel, "model");

/// One story submission from the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryRequest
{   pub protagonist1: String
  , pub protagonist2: String
  , pub genre: Genre
  , /// Free-text seed; trimmed when the prompt is built
    pub premise: String
  , pub language: Language
  , pub target_words: u32
  , pub temperature: f64
  , pub model: ChatModel
}

impl StoryRequest
{   /// Build a request with default language, length, temperature and model.
    /// Character names are stored trimmed.
    pub fn new(
      protagonist1: impl Into<String>
    , protagonist2: impl Into<String>
    , genre: Genre
    , premise: impl Into<String>
    ) -> Self
    {   StoryRequest
        {   protagonist1: protagonist1.into().trim().to_string()
          , protagonist2: protagonist2.into().trim().to_string()
          , genre
          , premise: premise.into()
          , language: Language::default()
          , target_words: DEFAULT_TARGET_WORDS
          , temperature: DEFAULT_TEMPERATURE
          , model: ChatModel::default()
        }
    }

    pub fn with_language(mut self, language: Language) -> Self
    {   self.language = language;
        self
    }

    pub fn with_target_words(mut self, target_words: u32) -> Self
    {   self.target_words = target_words;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self
    {   self.temperature = temperature;
        self
    }

    pub fn with_model(mut self, model: ChatModel) -> Self
    {   self.model = model;
        self
    }

    /// Checks the non-empty fields and the slider bounds
    pub fn validate(&self) -> Result<(), crate::error::Error>
    {   let required = [
          ("protagonist1", &self.protagonist1)
        , ("protagonist2", &self.protagonist2)
        , ("premise", &self.premise)
        ];
        for (field, value) in required
        {   if value.trim().is_empty()
            {   return Err(crate::error::Error::InvalidRequest(
                  format!("{} must not be empty", field)
                ));
            }
        }

        if !TARGET_WORDS_RANGE.contains(&self.target_words)
        {   return Err(crate::error::Error::InvalidRequest(format!(
              "target_words {} outside {}..={}",
              self.target_words,
              TARGET_WORDS_RANGE.start(),
              TARGET_WORDS_RANGE.end()
            )));
        }

        // NaN fails contains() as well
        if !TEMPERATURE_RANGE.contains(&self.temperature)
        {   return Err(crate::error::Error::InvalidRequest(format!(
              "temperature {} outside {}..={}",
              self.temperature,
              TEMPERATURE_RANGE.start(),
              TEMPERATURE_RANGE.end()
            )));
        }

        Ok(())
    }

    /// Name of the plain-text download for this story.
    /// Always a single path component.
    pub fn download_file_name(&self) -> String
    {   format!(
          "novel_{}_{}.txt",
          file_name_safe(&self.protagonist1),
          file_name_safe(&self.protagonist2)
        )
    }
}

/// Replace separators and characters file systems reject with `_`
fn file_name_safe(name: &str) -> String
{   name.chars()
      .map(|c| match c
      {   '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_'
        , c if c.is_control() => '_'
        , c => c
      })
      .collect()
}

#[cfg(test)]
mod tests
{   use super::*;
    use crate::error::Error;

    fn sample() -> StoryRequest
    {   StoryRequest::new("지우", "민서", Genre::Fantasy, "오래된 가게...")
    }

    #[test]
    fn new_applies_form_defaults()
    {   let req = StoryRequest::new(" 지우 ", "민서\n", Genre::Comedy, "x");
        assert_eq!(req.protagonist1, "지우");
        assert_eq!(req.protagonist2, "민서");
        assert_eq!(req.language, Language::Korean);
        assert_eq!(req.model, ChatModel::Gpt4oMini);
        assert_eq!(req.target_words, 1200);
        assert_eq!(req.temperature, 0.9);
    }

    #[test]
    fn valid_request_passes()
    {   assert_eq!(sample().validate(), Ok(()));
        assert!(sample().with_target_words(400).validate().is_ok());
        assert!(sample().with_target_words(3000).validate().is_ok());
        assert!(sample().with_temperature(0.0).validate().is_ok());
        assert!(sample().with_temperature(1.5).validate().is_ok());
    }

    #[test]
    fn blank_fields_are_rejected()
    {   let mut req = sample();
        req.premise = "   \n\t".to_string();
        match req.validate()
        {   Err(Error::InvalidRequest(msg)) => {
              assert!(msg.contains("premise"));
            }
          , other => panic!("expected InvalidRequest, got {:?}", other)
        }

        let req = StoryRequest::new("  ", "민서", Genre::Horror, "p");
        assert!(matches!(
          req.validate(),
          Err(Error::InvalidRequest(msg)) if msg.contains("protagonist1")
        ));
    }

    #[test]
    fn out_of_bounds_values_are_rejected()
    {   assert!(sample().with_target_words(399).validate().is_err());
        assert!(sample().with_target_words(3001).validate().is_err());
        assert!(sample().with_temperature(-0.1).validate().is_err());
        assert!(sample().with_temperature(1.6).validate().is_err());
        assert!(sample().with_temperature(f64::NAN).validate().is_err());
    }

    #[test]
    fn labels_parse_back()
    {   for genre in Genre::ALL
        {   assert_eq!(genre.label().parse::<Genre>(), Ok(genre));
        }
        assert_eq!("English".parse::<Language>(), Ok(Language::English));
        assert_eq!("gpt-4o".parse::<ChatModel>(), Ok(ChatModel::Gpt4o));
        assert!("western".parse::<Genre>().is_err());
    }

    #[test]
    fn serde_uses_labels()
    {   let json = serde_json::to_string(&Genre::Historical).unwrap();
        assert_eq!(json, "\"사극/역사\"");
        let model: ChatModel
          = serde_json::from_str("\"gpt-4o-mini\"").unwrap();
        assert_eq!(model, ChatModel::Gpt4oMini);
    }

    #[test]
    fn download_name_uses_both_characters()
    {   assert_eq!(sample().download_file_name(), "novel_지우_민서.txt");
    }

    #[test]
    fn download_name_stays_one_path_component()
    {   let req = StoryRequest::new("../x", "b/c", Genre::Mystery, "p");
        let name = req.download_file_name();
        assert_eq!(name, "novel_.._x_b_c.txt");
        assert_eq!(
          std::path::Path::new(&name).components().count(), 1
        );

        let req = StoryRequest::new("a\\b:c", "d*e?\"f\"<g>|h\ti", Genre::Comedy, "p");
        assert_eq!(req.download_file_name(), "novel_a_b_c_d_e__f__g__h_i.txt");
    }
}
