//! # Bootstrapper - 레지스트리와 로케이터 조립
//!
//! 새 [`ModuleRegistry`]와 [`ServiceLocator`]를 만들고, 전달받은 모듈을 순서대로 등록한 뒤
//! (각 모듈의 `register` 훅이 로케이터를 채움) 등록된 모든 이름을 부팅합니다.
//! `boot`가 멱등이고 의존성 우선이므로, 필요한 모듈이 모두 포함되어 있다면
//! 입력 순서와 무관하게 의존성 순서가 지켜집니다.
//!
//! ## 두 가지 사용 방식
//!
//! ### 명시적 컨텍스트 (권장)
//!
//! ```rust,ignore
//! use arabic_toolkit::core::{Bootstrapper, discovered_modules};
//!
//! let context = Bootstrapper::default().init(discovered_modules())?;
//! let settings = context.resolve::<ToolkitSettings>("toolkit.settings")?;
//! ```
//!
//! ### 프로세스 전역 파사드
//!
//! ```rust,ignore
//! use arabic_toolkit::core::bootstrap::global;
//!
//! global::init(modules)?;
//! let soundex = global::resolve::<Soundex>("soundex")?;
//! ```
//!
//! 전역 파사드는 `init`마다 이전 컨텍스트를 통째로 교체합니다. 테스트는
//! [`global::reset`]으로 상태를 비워야 합니다.

use std::any::Any;
use std::sync::Arc;

use log::info;

use crate::config::BootConfig;
use crate::core::contracts::{Module, discovered_modules};
use crate::core::errors::CoreResult;
use crate::core::locator::{ServiceLocator, SharedService};
use crate::core::registry::ModuleRegistry;
use crate::utils::display_terminal::{
    print_boxed_title, print_final_summary, print_step_complete, print_step_start, print_sub_task,
};

/// 부팅이 끝난 레지스트리와 로케이터 한 쌍
///
/// 부팅 이후 레지스트리는 읽기 전용으로 공유됩니다. 로케이터는 내부 가변성을 가지므로
/// 부팅 이후에도 서비스 등록과 해석이 가능합니다.
#[derive(Debug, Clone, Default)]
pub struct AppContext {
    registry: Arc<ModuleRegistry>,
    locator: Arc<ServiceLocator>,
}

impl AppContext {
    /// 빈 레지스트리와 빈 로케이터로 구성된 컨텍스트
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(registry: ModuleRegistry, locator: Arc<ServiceLocator>) -> Self {
        Self {
            registry: Arc::new(registry),
            locator,
        }
    }

    pub fn registry(&self) -> &Arc<ModuleRegistry> {
        &self.registry
    }

    pub fn locator(&self) -> &Arc<ServiceLocator> {
        &self.locator
    }

    /// 이름으로 서비스를 해석합니다. `locator().get(id)`와 같습니다.
    pub fn resolve<T: Any + Send + Sync>(&self, id: &str) -> CoreResult<Arc<T>> {
        self.locator.get::<T>(id)
    }

    /// 타입을 모르는 호출자를 위한 해석
    pub fn resolve_any(&self, id: &str) -> CoreResult<SharedService> {
        self.locator.get_any(id)
    }
}

/// 모듈 목록으로 컨텍스트를 조립하는 부트스트래퍼
#[derive(Debug, Clone, Default)]
pub struct Bootstrapper {
    config: BootConfig,
}

impl Bootstrapper {
    pub fn new(config: BootConfig) -> Self {
        Self { config }
    }

    /// 환경 변수에서 설정을 읽어 생성합니다.
    pub fn from_env() -> Self {
        Self::new(BootConfig::from_env())
    }

    pub fn config(&self) -> &BootConfig {
        &self.config
    }

    /// 모듈을 등록하고 모두 부팅한 새 컨텍스트를 반환합니다.
    ///
    /// 어느 단계든 실패하면 즉시 중단하며, 부분적으로 채워진 레지스트리와
    /// 로케이터는 버려집니다.
    pub fn init(&self, modules: Vec<Box<dyn Module>>) -> CoreResult<AppContext> {
        let mut registry = ModuleRegistry::new();
        let locator = Arc::new(ServiceLocator::new());

        self.populate(&mut registry, &locator, modules)?;

        Ok(AppContext::new(registry, locator))
    }

    /// `inventory`로 수집된 모든 모듈로 [`init`](Self::init)을 수행합니다.
    pub fn init_discovered(&self) -> CoreResult<AppContext> {
        self.init(discovered_modules())
    }

    /// 주어진 레지스트리와 로케이터에 모듈을 등록하고 부팅합니다.
    ///
    /// 실패 시 이미 진행된 등록과 부팅은 되돌리지 않습니다.
    pub fn populate(
        &self,
        registry: &mut ModuleRegistry,
        locator: &ServiceLocator,
        modules: Vec<Box<dyn Module>>,
    ) -> CoreResult<()> {
        let show = self.config.show_summary;
        if show {
            print_boxed_title("🔄 BOOTSTRAPPING MODULES");
            print_step_start(1, "Registering modules");
        }

        let module_count = modules.len();
        for module in modules {
            let name = module.name().to_string();
            registry.register(module, locator)?;
            if show {
                print_sub_task(&name, "✓ Registered");
            }
        }

        if show {
            print_step_complete(1, "Modules registered", module_count);
            print_step_start(2, "Booting modules");
        }

        registry.boot_all(locator)?;

        if show {
            for name in registry.boot_order() {
                print_sub_task(name, "✓ Booted");
            }
            print_step_complete(2, "Modules booted", registry.boot_order().len());
            print_final_summary(registry.len(), locator.len());
        }

        info!(
            "✅ Bootstrapped {} modules, {} services ({:?})",
            registry.len(),
            locator.len(),
            self.config.environment
        );
        Ok(())
    }
}

/// 프로세스 전역 컨텍스트 파사드
///
/// 컨텍스트는 [`init`]이 호출될 때 통째로 교체되며, 한 번도 초기화되지 않았다면
/// 첫 접근 시 빈 컨텍스트가 만들어집니다.
pub mod global {
    use std::any::Any;
    use std::sync::{Arc, PoisonError, RwLock};

    use log::debug;
    use once_cell::sync::Lazy;

    use super::{AppContext, Bootstrapper};
    use crate::core::contracts::Module;
    use crate::core::errors::CoreResult;
    use crate::core::locator::{ServiceLocator, SharedService};
    use crate::core::registry::ModuleRegistry;

    static CONTEXT: Lazy<RwLock<Option<AppContext>>> = Lazy::new(|| RwLock::new(None));

    /// 이전 컨텍스트를 버리고 새로 등록, 부팅합니다.
    ///
    /// 실패하더라도 그 시점까지 채워진 컨텍스트가 전역으로 남습니다.
    pub fn init(modules: Vec<Box<dyn Module>>) -> CoreResult<AppContext> {
        init_with(&Bootstrapper::from_env(), modules)
    }

    /// 지정한 부트스트래퍼 설정으로 [`init`]을 수행합니다.
    pub fn init_with(
        bootstrapper: &Bootstrapper,
        modules: Vec<Box<dyn Module>>,
    ) -> CoreResult<AppContext> {
        reset();

        let mut registry = ModuleRegistry::new();
        let locator = Arc::new(ServiceLocator::new());
        let result = bootstrapper.populate(&mut registry, &locator, modules);

        let context = AppContext::new(registry, locator);
        *CONTEXT.write().unwrap_or_else(PoisonError::into_inner) = Some(context.clone());

        result.map(|()| context)
    }

    /// 현재 전역 컨텍스트. 없으면 빈 컨텍스트를 만듭니다.
    pub fn context() -> AppContext {
        if let Some(context) = CONTEXT.read().unwrap_or_else(PoisonError::into_inner).as_ref() {
            return context.clone();
        }

        let mut slot = CONTEXT.write().unwrap_or_else(PoisonError::into_inner);
        slot.get_or_insert_with(|| {
            debug!("Creating empty process-wide context");
            AppContext::empty()
        })
        .clone()
    }

    pub fn registry() -> Arc<ModuleRegistry> {
        context().registry().clone()
    }

    pub fn locator() -> Arc<ServiceLocator> {
        context().locator().clone()
    }

    /// 전역 로케이터에서 이름으로 서비스를 해석합니다.
    pub fn resolve<T: Any + Send + Sync>(id: &str) -> CoreResult<Arc<T>> {
        locator().get::<T>(id)
    }

    pub fn resolve_any(id: &str) -> CoreResult<SharedService> {
        locator().get_any(id)
    }

    /// 전역 컨텍스트를 비웁니다. 테스트 격리용입니다.
    pub fn reset() {
        *CONTEXT.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
