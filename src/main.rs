//! Command-line form for generating a short story

use clap::Parser;
use log::{debug, error, info};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use novelist::credential::{resolve_api_key, ProcessEnv, SecretsFile};
use novelist::request::TARGET_WORDS_RANGE;
use novelist::{
  ChatModel, CompletionClient, Error, Genre, Language, NovelistBackend,
  NovelistConfig, StoryRequest,
};

#[derive(Debug, Parser)]
#[command(name = "novelist", about = "AI 소설 생성기: 주인공 이름과 장르, 간략한 스토리로 단편 소설을 생성합니다.")]
struct Args
{   /// 주인공 이름 1
    #[arg(long, default_value = "")]
    protagonist1: String

  , /// 주인공 이름 2
    #[arg(long, default_value = "")]
    protagonist2: String

  , /// 장르 (로맨스, 미스터리, 스릴러, 판타지, SF, 호러, 성장소설, 휴먼드라마, 코미디, 사극/역사)
    #[arg(long, default_value_t = Genre::default())]
    genre: Genre

  , /// 간략한 스토리(프롬프트)
    #[arg(long, conflicts_with = "premise_file")]
    premise: Option<String>

  , /// Read the premise from a file
    #[arg(long)]
    premise_file: Option<PathBuf>

  , /// 출력 언어 (한국어, English)
    #[arg(long, default_value_t = Language::default())]
    language: Language

  , /// 모델 (gpt-4o-mini, gpt-4o)
    #[arg(long, default_value_t = ChatModel::default())]
    model: ChatModel

  , /// 목표 길이(단어)
    #[arg(
      long,
      default_value_t = novelist::request::DEFAULT_TARGET_WORDS,
      value_parser = clap::value_parser!(u32).range(
        *TARGET_WORDS_RANGE.start() as i64..=*TARGET_WORDS_RANGE.end() as i64
      )
    )]
    target_words: u32

  , /// 창의성(temperature), 0.0 - 1.5
    #[arg(long, default_value_t = novelist::request::DEFAULT_TEMPERATURE)]
    temperature: f64

  , /// Directory the story text file is written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf
}

impl Args
{   fn premise(&self) -> Result<String, Error>
    {   match (&self.premise, &self.premise_file)
        {   (Some(text), _) => Ok(text.clone())
          , (None, Some(path)) => std::fs::read_to_string(path)
              .map_err(|e| Error::Other(format!(
                "cannot read premise file {}: {}", path.display(), e
              )))
          , (None, None) => Ok(String::new())
        }
    }
}

/// Write the story next to the other downloads; returns the path
fn write_story(
  output_dir: &Path
, request: &StoryRequest
, story: &str
) -> Result<PathBuf, Error>
{   let path = output_dir.join(request.download_file_name());
    std::fs::write(&path, story.as_bytes()).map_err(|e| {
      error!("Cannot write {}: {}", path.display(), e);
      Error::Other(format!("cannot write {}: {}", path.display(), e))
    })?;
    info!("Story written to {}", path.display());
    Ok(path)
}

#[tokio::main]
async fn main() -> ExitCode
{   env_logger::init();
    let args = Args::parse();
    debug!("Parsed arguments: {:?}", args);

    let config = match NovelistConfig::from_env()
    {   Ok(config) => config
      , Err(e) => {
          eprintln!("{}", e);
          return ExitCode::FAILURE;
        }
    };

    let secrets = match SecretsFile::load(&config.secrets_path)
    {   Ok(secrets) => secrets
      , Err(e) => {
          eprintln!("{}", e);
          return ExitCode::FAILURE;
        }
    };

    let credential = resolve_api_key(&secrets, &ProcessEnv);
    if credential.is_none()
    {   eprintln!(
          "OPENAI_API_KEY가 설정되어 있지 않습니다. \
           secrets 파일이나 환경 변수에 키를 등록하세요."
        );
        return ExitCode::FAILURE;
    }

    let premise = match args.premise()
    {   Ok(premise) => premise
      , Err(e) => {
          eprintln!("{}", e);
          return ExitCode::FAILURE;
        }
    };

    let request = StoryRequest::new(
        &args.protagonist1
      , &args.protagonist2
      , args.genre
      , premise
      )
      .with_language(args.language)
      .with_target_words(args.target_words)
      .with_temperature(args.temperature)
      .with_model(args.model);

    let required = [
      &request.protagonist1
    , &request.protagonist2
    , &request.premise
    ];
    if required.iter().any(|s| s.trim().is_empty())
    {   eprintln!("주인공 이름 2개와 스토리 프롬프트를 모두 입력해주세요.");
        return ExitCode::FAILURE;
    }

    let backend = NovelistBackend::new(
      CompletionClient::from_config(&config, credential)
    );

    eprintln!("소설을 집필 중입니다…");
    let result = match backend.generate_novel(request.clone()).await
    {   Ok(mut reply_rx) => reply_rx.recv().await
          .unwrap_or_else(|| Err(Error::Other(
            "Backend disconnected".to_string()
          )))
      , Err(e) => Err(e)
    };

    if let Err(e) = backend.shutdown().await
    {   debug!("Backend shutdown: {}", e);
    }

    let story = match result
    {   Ok(story) => story
      , Err(e) => {
          error!("Generation failed: {}", e);
          eprintln!("{}", e);
          return ExitCode::FAILURE;
        }
    };

    eprintln!("완료! 아래에서 결과를 확인하세요.");

    let written = write_story(&args.output_dir, &request, &story);
    if let Ok(path) = &written
    {   eprintln!("소설 텍스트 저장: {}", path.display());
    }

    println!("{}", story);

    match written
    {   Ok(_) => ExitCode::SUCCESS
      , Err(e) => {
          eprintln!("{}", e);
          ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests
{   use super::*;

    fn args_with(premise: Option<&str>, premise_file: Option<PathBuf>) -> Args
    {   let mut argv = vec!["novelist".to_string()];
        if let Some(text) = premise
        {   argv.push("--premise".to_string());
            argv.push(text.to_string());
        }
        if let Some(path) = premise_file
        {   argv.push("--premise-file".to_string());
            argv.push(path.display().to_string());
        }
        Args::parse_from(argv)
    }

    #[test]
    fn story_file_lands_in_output_dir()
    {   let dir = tempfile::tempdir().unwrap();
        let req = StoryRequest::new("../지우", "민서", Genre::Fantasy, "p");

        let path = write_story(dir.path(), &req, "THE END.").unwrap();
        assert_eq!(path.parent(), Some(dir.path()));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "THE END.");
    }

    #[test]
    fn unwritable_output_dir_is_an_error()
    {   let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-dir");
        let req = StoryRequest::new("지우", "민서", Genre::Fantasy, "p");

        assert!(matches!(
          write_story(&missing, &req, "THE END."),
          Err(Error::Other(_))
        ));
    }

    #[test]
    fn premise_comes_from_file()
    {   let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("premise.txt");
        std::fs::write(&file, "오래된 가게...").unwrap();

        let args = args_with(None, Some(file));
        assert_eq!(args.premise(), Ok("오래된 가게...".to_string()));
    }

    #[test]
    fn unreadable_premise_file_is_not_a_request_error()
    {   let dir = tempfile::tempdir().unwrap();
        let args = args_with(None, Some(dir.path().join("missing.txt")));
        assert!(matches!(args.premise(), Err(Error::Other(_))));
    }

    #[test]
    fn temperature_arg_keeps_its_decimal_value()
    {   let args = Args::parse_from(["novelist", "--temperature", "0.9"]);
        assert_eq!(args.temperature, 0.9);
        assert_eq!(args_with(Some("p"), None).temperature, 0.9);
    }
}
