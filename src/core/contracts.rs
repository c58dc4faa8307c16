//! # Module & Service Contracts
//!
//! 코어가 외부 협력자(각 언어 처리 모듈)와 맺는 계약을 정의합니다.
//!
//! - [`Module`]: 이름, 버전, 의존성 목록과 두 개의 생명주기 훅을 가진 단위
//! - [`Service`]: 로케이터에 저장되는 값이 선택적으로 따르는 문서화 관례
//! - [`ModuleRegistration`]: `inventory`로 수집되는 모듈 생성자
//!
//! ## 모듈 작성 예제
//!
//! ```rust,ignore
//! use arabic_toolkit::core::{HookResult, Module, ModuleInfo, ServiceLocator};
//!
//! struct SoundexModule {
//!     info: ModuleInfo,
//! }
//!
//! impl SoundexModule {
//!     fn new() -> Self {
//!         Self { info: ModuleInfo::new("soundex", "1.0.0").depends_on(["normalizer"]) }
//!     }
//! }
//!
//! impl Module for SoundexModule {
//!     fn info(&self) -> &ModuleInfo { &self.info }
//!     fn info_mut(&mut self) -> &mut ModuleInfo { &mut self.info }
//!
//!     fn register(&self, locator: &ServiceLocator) -> HookResult {
//!         locator.factory("soundex", |l| Ok(Soundex::new(l.get::<Normalizer>("normalizer")?)));
//!         Ok(())
//!     }
//! }
//! ```

use std::collections::HashMap;

use serde::Serialize;

use crate::core::errors::HookResult;
use crate::core::locator::ServiceLocator;

/// 모듈 메타데이터
///
/// 이름은 레지스트리의 키이고, 의존성은 객체 참조가 아닌 이름으로
/// 보관되어 부팅 시점에 조회됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    name: String,
    version: String,
    dependencies: Vec<String>,
    enabled: bool,
}

impl ModuleInfo {
    /// 의존성이 없는 활성 상태의 메타데이터를 생성합니다.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            dependencies: Vec::new(),
            enabled: true,
        }
    }

    /// 의존성 이름을 선언 순서대로 추가합니다.
    pub fn depends_on<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies
            .extend(dependencies.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// 레지스트리가 관리하는 모듈의 공통 인터페이스
///
/// 구현체는 [`ModuleInfo`]만 노출하면 나머지 접근자는 기본 구현을 사용합니다.
/// 활성화 플래그는 정보 제공용이며 레지스트리가 강제하지 않습니다.
pub trait Module: Send + Sync {
    /// 모듈 메타데이터
    fn info(&self) -> &ModuleInfo;

    /// 활성화 플래그 변경용 가변 메타데이터
    fn info_mut(&mut self) -> &mut ModuleInfo;

    /// 레지스트리에 등록되는 즉시, 동기적으로 호출됩니다.
    ///
    /// 보통 이 시점에 로케이터에 서비스 정의를 채워 넣습니다.
    fn register(&self, _locator: &ServiceLocator) -> HookResult {
        Ok(())
    }

    /// 모든 의존성이 부팅된 뒤 한 번만 호출됩니다.
    fn boot(&self, _locator: &ServiceLocator) -> HookResult {
        Ok(())
    }

    fn name(&self) -> &str {
        self.info().name()
    }

    fn version(&self) -> &str {
        self.info().version()
    }

    fn dependencies(&self) -> &[String] {
        self.info().dependencies()
    }

    fn is_enabled(&self) -> bool {
        self.info().is_enabled()
    }

    fn enable(&mut self) {
        self.info_mut().set_enabled(true);
    }

    fn disable(&mut self) {
        self.info_mut().set_enabled(false);
    }
}

/// 로케이터에 저장되는 서비스 값의 문서화 관례
///
/// 로케이터는 저장하는 값의 타입을 검사하지 않으므로 이 trait은 강제되지 않습니다.
/// 설정이나 가용성을 외부에 알리고 싶은 서비스만 구현합니다.
pub trait Service: Send + Sync {
    /// 서비스의 표시 이름
    fn service_name(&self) -> &str;

    /// 서비스 설정값
    fn config(&self) -> HashMap<String, serde_json::Value>;

    /// 현재 서비스를 사용할 수 있는지 여부
    fn is_available(&self) -> bool;
}

/// 모듈 등록 정보
///
/// `inventory::submit!`으로 제출되어 컴파일 타임에 수집됩니다.
/// [`crate::core::bootstrap::Bootstrapper::init_discovered`]가 이 목록을 사용합니다.
pub struct ModuleRegistration {
    /// 모듈 이름 (정렬 키)
    pub name: &'static str,
    /// 모듈 생성 함수
    pub constructor: fn() -> Box<dyn Module>,
}

inventory::collect!(ModuleRegistration);

/// 수집된 모든 모듈을 이름 순으로 생성합니다.
pub fn discovered_modules() -> Vec<Box<dyn Module>> {
    let mut registrations: Vec<&ModuleRegistration> =
        inventory::iter::<ModuleRegistration>().collect();
    registrations.sort_by_key(|registration| registration.name);

    registrations
        .into_iter()
        .map(|registration| (registration.constructor)())
        .collect()
}
