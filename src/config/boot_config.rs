//! 부팅 및 실행 환경 설정 관리 모듈
//!
//! 실행 환경과 부팅 요약 출력 여부를 관리합니다.

use std::env;
use std::path::{Path, PathBuf};

use log::{debug, error, info};
use serde::Serialize;

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// 개발 환경 - 부팅 요약을 기본으로 출력
    Development,
    /// 테스트 환경
    Test,
    /// 스테이징 환경
    Staging,
    /// 프로덕션 환경
    Production,
}

impl Environment {
    /// 현재 실행 환경을 감지합니다.
    ///
    /// `ENVIRONMENT` 환경 변수를 확인하며,
    /// 설정되지 않은 경우 `Production`을 기본값으로 사용합니다.
    pub fn current() -> Self {
        Self::parse(&env::var("ENVIRONMENT").unwrap_or_else(|_| "production".to_string()))
    }

    /// 문자열에서 Environment를 생성합니다. 알 수 없는 값은 `Production`입니다.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// 부트스트래퍼 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootConfig {
    pub environment: Environment,
    /// 부팅 후 터미널 요약 박스 출력 여부
    pub show_summary: bool,
}

impl BootConfig {
    /// 환경 변수에서 설정을 읽습니다.
    ///
    /// # Environment Variables
    ///
    /// - `ENVIRONMENT`: 실행 환경 (기본값: production)
    /// - `BOOT_SUMMARY`: `true`/`false`, 지정하지 않으면 개발 환경에서만 출력
    pub fn from_env() -> Self {
        let mut config = Self::for_environment(Environment::current());

        if let Ok(raw) = env::var("BOOT_SUMMARY") {
            match parse_flag(&raw) {
                Some(flag) => config.show_summary = flag,
                None => error!("BOOT_SUMMARY 파싱 실패: {}. 기본값 {} 사용", raw, config.show_summary),
            }
        }

        config
    }

    /// 특정 환경의 기본 설정
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            show_summary: environment == Environment::Development,
        }
    }
}

impl Default for BootConfig {
    fn default() -> Self {
        Self::for_environment(Environment::Production)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// 프로필에 대응하는 env 파일 이름
///
/// | PROFILE | 파일 |
/// |---------|------|
/// | `dev`, `development` (기본값) | `.env.dev` |
/// | `test` | `.env.test` |
/// | `prod`, `production` | `.env.prod` |
/// | 기타 | `.env` |
pub fn env_file_name(profile: &str) -> &'static str {
    match profile.trim().to_lowercase().as_str() {
        "dev" | "development" => ".env.dev",
        "test" => ".env.test",
        "prod" | "production" => ".env.prod",
        _ => ".env",
    }
}

/// `PROFILE`에 맞는 env 파일을 현재 디렉터리에서 로드하고, 로드한 경로를 반환합니다.
///
/// 파일이 없으면 프로세스 환경 변수만 사용하며 `None`을 반환합니다.
pub fn load_env_file() -> Option<PathBuf> {
    let profile = env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());
    load_profile_env(Path::new("."), &profile)
}

fn load_profile_env(dir: &Path, profile: &str) -> Option<PathBuf> {
    let path = dir.join(env_file_name(profile));

    match dotenv::from_path(&path) {
        Ok(()) => {
            info!("Profile {}: {} 로드 됨", profile, path.display());
            Some(path)
        }
        Err(e) if e.not_found() => {
            debug!("Profile {}: {} 없음, 프로세스 환경 변수만 사용", profile, path.display());
            None
        }
        Err(e) => {
            error!("{} 파일 로드 실패: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_string() {
        assert_eq!(Environment::parse("development"), Environment::Development);
        assert_eq!(Environment::parse("DEV"), Environment::Development);
        assert_eq!(Environment::parse("test"), Environment::Test);
        assert_eq!(Environment::parse("stage"), Environment::Staging);
        assert_eq!(Environment::parse("production"), Environment::Production);
        assert_eq!(Environment::parse("unknown"), Environment::Production);
    }

    #[test]
    fn test_summary_default_for_each_environment() {
        assert!(BootConfig::for_environment(Environment::Development).show_summary);
        assert!(!BootConfig::for_environment(Environment::Test).show_summary);
        assert!(!BootConfig::for_environment(Environment::Staging).show_summary);
        assert!(!BootConfig::default().show_summary);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_environment_round_trips_through_as_str() {
        for environment in [
            Environment::Development,
            Environment::Test,
            Environment::Staging,
            Environment::Production,
        ] {
            assert_eq!(Environment::parse(environment.as_str()), environment);
        }
    }

    #[test]
    fn test_env_file_name_per_profile() {
        assert_eq!(env_file_name("dev"), ".env.dev");
        assert_eq!(env_file_name(" Production "), ".env.prod");
        assert_eq!(env_file_name("test"), ".env.test");
        assert_eq!(env_file_name("local"), ".env");
    }

    #[test]
    fn test_load_profile_env_reports_loaded_file() {
        let dir = env::temp_dir().join(format!("arabic_toolkit_env_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(".env.test"), "ARABIC_TOOLKIT_ENV_MARKER=loaded\n").unwrap();

        let loaded = load_profile_env(&dir, "test");

        assert_eq!(loaded, Some(dir.join(".env.test")));
        assert_eq!(env::var("ARABIC_TOOLKIT_ENV_MARKER").unwrap(), "loaded");
        // 파일이 없는 프로필은 에러 없이 None
        assert_eq!(load_profile_env(&dir, "prod"), None);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
