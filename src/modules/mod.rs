//! 코어와 함께 제공되는 기본 모듈
//!
//! 언어 처리 모듈은 이 크레이트 밖에서 [`crate::core::Module`]을 구현하고,
//! `inventory::submit!`으로 [`crate::core::ModuleRegistration`]을 제출하여 등록됩니다.

pub mod core_module;

pub use core_module::{CORE_MODULE_NAME, CoreModule, SETTINGS_SERVICE_ID, ToolkitSettings};
