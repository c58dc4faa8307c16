//! 툴킷 공통 설정을 제공하는 기본 모듈
//!
//! 다른 모듈이 의존할 수 있는 `core` 모듈입니다. 등록 시 [`ToolkitSettings`]를
//! 로케이터에 값으로 넣어, 언어 처리 모듈들이 실행 환경과 버전을 조회할 수 있게 합니다.

use std::collections::HashMap;

use log::info;
use serde_json::json;

use crate::config::{BootConfig, Environment};
use crate::core::contracts::{Module, ModuleInfo, ModuleRegistration, Service};
use crate::core::errors::HookResult;
use crate::core::locator::ServiceLocator;

/// 설정 서비스 ID
pub const SETTINGS_SERVICE_ID: &str = "toolkit.settings";

/// 모듈 이름
pub const CORE_MODULE_NAME: &str = "core";

/// 툴킷 전역 설정 서비스
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolkitSettings {
    pub environment: Environment,
    pub version: String,
}

impl Service for ToolkitSettings {
    fn service_name(&self) -> &str {
        SETTINGS_SERVICE_ID
    }

    fn config(&self) -> HashMap<String, serde_json::Value> {
        HashMap::from([
            ("environment".to_string(), json!(self.environment)),
            ("version".to_string(), json!(self.version)),
        ])
    }

    fn is_available(&self) -> bool {
        true
    }
}

pub struct CoreModule {
    info: ModuleInfo,
    settings: ToolkitSettings,
}

impl CoreModule {
    pub fn new(config: &BootConfig) -> Self {
        let version = env!("CARGO_PKG_VERSION");
        Self {
            info: ModuleInfo::new(CORE_MODULE_NAME, version),
            settings: ToolkitSettings {
                environment: config.environment,
                version: version.to_string(),
            },
        }
    }
}

impl Module for CoreModule {
    fn info(&self) -> &ModuleInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut ModuleInfo {
        &mut self.info
    }

    fn register(&self, locator: &ServiceLocator) -> HookResult {
        locator.set(SETTINGS_SERVICE_ID, self.settings.clone());
        Ok(())
    }

    fn boot(&self, _locator: &ServiceLocator) -> HookResult {
        info!(
            "Toolkit core v{} ready ({})",
            self.settings.version,
            self.settings.environment.as_str()
        );
        Ok(())
    }
}

fn construct() -> Box<dyn Module> {
    Box::new(CoreModule::new(&BootConfig::from_env()))
}

inventory::submit! {
    ModuleRegistration {
        name: CORE_MODULE_NAME,
        constructor: construct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::ModuleRegistry;

    #[test]
    fn test_registers_settings_service() {
        let locator = ServiceLocator::new();
        let mut registry = ModuleRegistry::new();
        let config = BootConfig::for_environment(Environment::Test);

        registry
            .register(Box::new(CoreModule::new(&config)), &locator)
            .unwrap();
        registry.boot(CORE_MODULE_NAME, &locator).unwrap();

        let settings = locator.get::<ToolkitSettings>(SETTINGS_SERVICE_ID).unwrap();
        assert_eq!(settings.environment, Environment::Test);
        assert_eq!(settings.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_settings_follow_service_contract() {
        let settings = ToolkitSettings {
            environment: Environment::Staging,
            version: "0.1.0".to_string(),
        };

        let config = settings.config();

        assert_eq!(settings.service_name(), "toolkit.settings");
        assert!(settings.is_available());
        assert_eq!(config["environment"], json!("staging"));
        assert_eq!(config["version"], json!("0.1.0"));
    }
}
