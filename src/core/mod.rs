//! # Core Framework Module
//!
//! 툴킷의 모든 언어 처리 모듈을 묶는 기반 구조입니다.
//! 의존성 순서를 지키는 모듈 생명주기 관리자와 지연 싱글톤 서비스 로케이터를 제공합니다.
//!
//! ## 모듈 구성
//!
//! ### [`registry`] - 모듈 레지스트리
//! - **이름 기반 등록**: 중복 이름은 `register` 훅 호출 전에 거부
//! - **위상 부팅**: 의존성을 먼저 부팅하는 깊이 우선 부팅
//! - **순환 감지**: 순환을 이루는 이름 체인을 에러로 보고
//!
//! ### [`locator`] - 서비스 로케이터
//! - **값/팩토리 등록**: 문자열 ID 기반
//! - **싱글톤 보장**: 팩토리는 첫 요청에서 한 번만 실행
//! - **Last write wins**: 재등록 시 해당 ID의 캐시만 무효화
//!
//! ### [`bootstrap`] - 부트스트래퍼
//! - **명시적 컨텍스트**: [`AppContext`]로 레지스트리와 로케이터를 함께 전달
//! - **전역 파사드**: [`bootstrap::global`]로 프로세스 단위 접근
//!
//! ### [`contracts`] - 협력자 계약
//! - **Module**: 이름, 버전, 의존성, `register`/`boot` 훅
//! - **Service**: 서비스 이름, 설정, 가용성 (강제되지 않는 관례)
//! - **ModuleRegistration**: `inventory` 기반 모듈 수집
//!
//! ### [`errors`] - 통합 에러 처리
//! - **CoreError**: 코어 전역 에러 타입
//! - **훅 에러 보존**: 모듈 훅과 팩토리 에러를 감싸지 않고 전달
//!
//! ## 부팅 흐름
//!
//! ```text
//! modules ──▶ Bootstrapper::init
//!               ├─ ModuleRegistry::register(each)   ← register 훅이 로케이터를 채움
//!               └─ ModuleRegistry::boot(each name)  ← 의존성 먼저, 그다음 boot 훅
//!                                  │
//!                                  ▼
//!                 AppContext { registry, locator }
//! ```
//!
//! ## 트러블슈팅
//!
//! ### 순환 의존성
//! ```text
//! Circular dependency detected: tokenizer -> lemmatizer -> tokenizer
//! ```
//! **해결**: 공통 부분을 별도 모듈로 분리하여 단방향 의존성으로 변경
//!
//! ### 미등록 서비스
//! ```text
//! Service not found: soundex
//! ```
//! **해결**: 해당 서비스를 등록하는 모듈이 `init` 목록에 포함되었는지 확인

pub mod bootstrap;
pub mod contracts;
pub mod errors;
pub mod locator;
pub mod registry;

pub use bootstrap::{AppContext, Bootstrapper};
pub use contracts::{Module, ModuleInfo, ModuleRegistration, Service, discovered_modules};
pub use errors::{BoxError, CoreError, CoreResult, HookContext, HookResult};
pub use locator::{ServiceDefinition, ServiceFactory, ServiceLocator, SharedService};
pub use registry::{ModuleDescriptor, ModuleRegistry, ModuleState};
