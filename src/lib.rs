//! 아랍어 텍스트 툴킷 코어
//!
//! 키보드 배열 복구, 음성 인코딩, 토큰화, 음역, 히즈라력 계산, 기도 시간 등
//! 서로 독립적인 언어 처리 모듈들을 하나로 묶는 기반 구조입니다.
//! 의존성 순서를 지키는 모듈 생명주기 관리와 지연 싱글톤 서비스 로케이터를 제공합니다.
//!
//! # Features
//!
//! - **모듈 레지스트리**: 이름 기반 등록, 의존성 우선 부팅, 순환 감지
//! - **서비스 로케이터**: 값/팩토리 등록, 첫 요청 시 한 번만 생성
//! - **부트스트래퍼**: 모듈 목록으로 레지스트리와 로케이터를 조립
//! - **모듈 수집**: `inventory` 기반 자동 등록
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  Bootstrapper   │ ← 모듈 목록을 받아 조립
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ ModuleRegistry  │ ← register 훅, 의존성 순서 boot 훅
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ ServiceLocator  │ ← 서비스 정의와 싱글톤 캐시
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use arabic_toolkit::core::{Bootstrapper, discovered_modules};
//! use arabic_toolkit::modules::{SETTINGS_SERVICE_ID, ToolkitSettings};
//!
//! let context = Bootstrapper::from_env().init(discovered_modules())?;
//! let settings = context.resolve::<ToolkitSettings>(SETTINGS_SERVICE_ID)?;
//! ```

pub mod config;
pub mod core;
pub mod modules;
pub mod utils;
