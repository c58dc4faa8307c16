//! # Configuration Module
//!
//! 부트스트래퍼의 실행 설정을 관리하는 모듈입니다.
//! 환경 변수 기반의 설정값을 한곳에서 읽어 [`BootConfig`]로 제공합니다.
//!
//! ## 모듈 구성
//!
//! - [`boot_config`] - 실행 환경, 부팅 요약 출력, `.env` 파일 로드
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! export ENVIRONMENT="development"  # development, test, staging, production
//! export BOOT_SUMMARY="true"        # 부팅 요약 박스 출력
//! export PROFILE="dev"              # .env.dev / .env.prod 선택
//! export RUST_LOG="arabic_toolkit=debug"
//! ```

pub mod boot_config;

pub use boot_config::*;
