//! # Core Error Handling System
//!
//! 모듈 레지스트리, 서비스 로케이터, 부트스트래퍼가 공유하는 통합 에러 타입입니다.
//! `thiserror`로 `Error` trait을 구현하며, 호출자가 에러 종류를 `match`로
//! 구분할 수 있도록 모든 실패를 하나의 열거형으로 모읍니다.
//!
//! ## 에러 분류
//!
//! | CoreError | 발생 위치 | 페이로드 |
//! |-----------|-----------|----------|
//! | `DuplicateModule` | `ModuleRegistry::register` | 중복된 모듈 이름 |
//! | `ModuleNotFound` | `ModuleRegistry::boot` / `get` | 찾지 못한 모듈 이름 |
//! | `CircularDependency` | `ModuleRegistry::boot` | 순환을 이루는 이름 체인 |
//! | `ServiceNotFound` | `ServiceLocator::get` | 찾지 못한 서비스 ID |
//! | `ServiceTypeMismatch` | `ServiceLocator::get::<T>` | 서비스 ID, 요청 타입 |
//! | `CircularService` | 팩토리 재진입 | 해석 중인 서비스 체인 |
//! | `Hook` | 모듈 훅, 팩토리 | 원본 에러 그대로 |
//!
//! ## 훅 에러 전파
//!
//! 모듈의 `register`/`boot` 훅과 서비스 팩토리는 [`BoxError`]를 반환합니다.
//! 코어는 이 에러를 잡아서 다른 의미로 바꾸지 않습니다. [`CoreError::from_hook`]은
//! 먼저 `CoreError`로 다운캐스트를 시도하므로, 팩토리 안에서 발생한
//! `ServiceNotFound`는 바깥 호출자에게도 `ServiceNotFound`로 도착합니다.
//!
//! ```rust,ignore
//! use arabic_toolkit::core::errors::{CoreError, HookContext};
//!
//! locator.factory("lexicon", |_| {
//!     let raw = std::fs::read_to_string("lexicon.txt")
//!         .hook_context("Failed to read lexicon")?;
//!     Ok(raw)
//! });
//! ```

use std::error::Error as StdError;

use thiserror::Error;

/// 모듈 훅과 서비스 팩토리가 반환하는 에러 타입
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// 코어 전역 에러 타입
#[derive(Error, Debug)]
pub enum CoreError {
    /// 이미 사용 중인 이름으로 모듈 등록을 시도한 경우
    ///
    /// 이 에러가 반환될 때 새 모듈의 `register` 훅은 호출되지 않습니다.
    #[error("Module already registered: {0}")]
    DuplicateModule(String),

    /// 등록되지 않은 모듈을 부팅하거나 조회한 경우
    ///
    /// 의존성 이름이 등록되어 있지 않을 때도 이 에러가 발생하며,
    /// 페이로드는 최초 요청한 모듈이 아니라 실제로 찾지 못한 이름입니다.
    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    /// 부팅 중 의존성 순환이 감지된 경우
    ///
    /// `chain`은 순환이 시작된 모듈부터 다시 등장한 모듈까지의 이름 목록이며,
    /// 마지막 원소는 첫 원소와 같습니다 (`a -> b -> c -> a`).
    #[error("Circular dependency detected: {}", .chain.join(" -> "))]
    CircularDependency { chain: Vec<String> },

    /// 등록되지 않은 서비스 ID를 요청한 경우
    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    /// 서비스는 존재하지만 요청한 타입으로 다운캐스트할 수 없는 경우
    #[error("Type mismatch for service {id}: expected {expected}")]
    ServiceTypeMismatch { id: String, expected: &'static str },

    /// 팩토리가 해석 중인 자기 자신을 다시 요청한 경우
    #[error("Circular service resolution: {}", .chain.join(" -> "))]
    CircularService { chain: Vec<String> },

    /// 모듈 훅이나 팩토리가 반환한 에러
    #[error(transparent)]
    Hook(BoxError),
}

impl CoreError {
    /// 훅이나 팩토리가 돌려준 에러를 `CoreError`로 되돌립니다.
    ///
    /// 원본이 `CoreError`라면 같은 변형을 그대로 반환하고,
    /// 그 외의 에러는 손대지 않고 `Hook`에 담습니다.
    pub fn from_hook(err: BoxError) -> Self {
        match err.downcast::<CoreError>() {
            Ok(core) => *core,
            Err(other) => CoreError::Hook(other),
        }
    }

    /// 모듈 또는 서비스 부재로 인한 에러인지 확인합니다.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::ModuleNotFound(_) | CoreError::ServiceNotFound(_)
        )
    }

    /// 서비스 부재 에러인지 확인합니다.
    ///
    /// "있으면 쓰고 없으면 건너뛰는" 형태의 호출자가 다른 실패와
    /// 구분하기 위해 사용합니다.
    pub fn is_service_not_found(&self) -> bool {
        matches!(self, CoreError::ServiceNotFound(_))
    }

    /// 순환 에러가 담고 있는 이름 체인을 반환합니다.
    pub fn cycle_chain(&self) -> Option<&[String]> {
        match self {
            CoreError::CircularDependency { chain } | CoreError::CircularService { chain } => {
                Some(chain)
            }
            _ => None,
        }
    }

    /// `Hook` 변형에 담긴 원본 에러를 특정 타입으로 참조합니다.
    pub fn hook_source<E: StdError + 'static>(&self) -> Option<&E> {
        match self {
            CoreError::Hook(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type CoreResult<T> = Result<T, CoreError>;

/// 훅 결과 타입 별칭
pub type HookResult<T = ()> = Result<T, BoxError>;

/// 외부 라이브러리 에러에 문맥을 붙여 훅 에러로 변환하는 확장 trait
///
/// 모듈 작성자가 파일 읽기, 파싱 등의 실패를 `?` 한 번으로
/// 훅 에러로 올릴 수 있도록 돕습니다.
pub trait HookContext<T> {
    /// 컨텍스트 메시지와 함께 에러를 변환합니다.
    fn hook_context(self, msg: &str) -> HookResult<T>;

    /// 클로저로 지연 평가된 컨텍스트를 제공합니다.
    fn with_hook_context<F>(self, f: F) -> HookResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> HookContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn hook_context(self, msg: &str) -> HookResult<T> {
        self.map_err(|e| format!("{}: {}", msg, e).into())
    }

    fn with_hook_context<F>(self, f: F) -> HookResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| format!("{}: {}", f(), e).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("lexicon missing")]
    struct LexiconMissing;

    #[test]
    fn test_circular_dependency_display() {
        let error = CoreError::CircularDependency {
            chain: vec!["A".into(), "B".into(), "C".into(), "A".into()],
        };

        assert_eq!(error.to_string(), "Circular dependency detected: A -> B -> C -> A");
        assert_eq!(error.cycle_chain().map(|c| c.len()), Some(4));
    }

    #[test]
    fn test_from_hook_keeps_core_variant() {
        let boxed: BoxError = Box::new(CoreError::ServiceNotFound("missing".into()));
        let error = CoreError::from_hook(boxed);

        assert!(error.is_service_not_found());
        assert_eq!(error.to_string(), "Service not found: missing");
    }

    #[test]
    fn test_from_hook_wraps_foreign_error_untouched() {
        let boxed: BoxError = Box::new(LexiconMissing);
        let error = CoreError::from_hook(boxed);

        assert!(matches!(error, CoreError::Hook(_)));
        assert!(error.hook_source::<LexiconMissing>().is_some());
        assert_eq!(error.to_string(), "lexicon missing");
    }

    #[test]
    fn test_not_found_predicates() {
        assert!(CoreError::ModuleNotFound("x".into()).is_not_found());
        assert!(!CoreError::ModuleNotFound("x".into()).is_service_not_found());
        assert!(CoreError::ServiceNotFound("x".into()).is_not_found());
        assert!(!CoreError::DuplicateModule("x".into()).is_not_found());
    }

    #[test]
    fn test_hook_context_trait() {
        let result: Result<(), &str> = Err("original error");
        let hook_result = result.hook_context("Additional context");

        let message = hook_result.unwrap_err().to_string();
        assert!(message.contains("Additional context"));
        assert!(message.contains("original error"));
    }
}
