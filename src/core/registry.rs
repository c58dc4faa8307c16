//! # Module Registry - 의존성 순서 기반 모듈 부팅
//!
//! 이름을 키로 모듈을 보관하고, 선언된 의존성을 먼저 부팅한 뒤 자신의 `boot` 훅을
//! 호출하는 깊이 우선 위상 부팅을 수행합니다. 순환은 부팅 도중에 바로 감지됩니다.
//!
//! ## 생명주기
//!
//! ```text
//!  register()            boot() 진입              의존성 + boot 훅 성공
//! ───────────▶ Registered ───────────▶ Booting ───────────────────────▶ Booted
//!                  ▲                      │
//!                  └──────────────────────┘
//!                     의존성/훅 실패 시 복귀
//! ```
//!
//! - `Booted`는 종단 상태이며 이후 `boot` 호출은 아무것도 하지 않습니다.
//! - `Booting` 상태인 이름을 다시 부팅하려 하면 순환입니다.
//!
//! ## 순환 감지
//!
//! 모듈별 상태는 맵에 보관되어 O(1)로 확인하고, 순서가 있는 해석 스택은
//! 에러 체인을 만들 때만 사용합니다. 체인은 순환이 시작된 이름부터
//! 다시 등장한 이름까지 담으며, 닫는 이름을 반복합니다.
//!
//! ```text
//! A ─▶ B ─▶ C ─▶ A      =>  Circular dependency detected: A -> B -> C -> A
//! ```
//!
//! ## 스레드 안전성
//!
//! 모든 변경 연산은 `&mut self`를 요구하므로 한 레지스트리를 동시에 부팅할 수 없습니다.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, info, warn};
use serde::Serialize;

use crate::core::contracts::Module;
use crate::core::errors::{CoreError, CoreResult};
use crate::core::locator::ServiceLocator;

/// 모듈의 부팅 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleState {
    /// 등록됨, 아직 부팅 전
    Registered,
    /// 해석 스택 위에서 부팅 중
    Booting,
    /// 부팅 완료
    Booted,
}

/// 모듈 상태 요약 (로그, 진단 출력용)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDescriptor {
    pub name: String,
    pub version: String,
    pub dependencies: Vec<String>,
    pub enabled: bool,
    pub state: ModuleState,
}

/// 이름 기반 모듈 레지스트리
#[derive(Default)]
pub struct ModuleRegistry {
    /// 등록 순서를 유지하는 모듈 테이블
    modules: IndexMap<String, Box<dyn Module>>,
    states: HashMap<String, ModuleState>,
    /// 현재 부팅 중인 이름들 (바깥쪽부터)
    stack: Vec<String>,
    boot_order: Vec<String>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 모듈을 등록하고 `register` 훅을 즉시 호출합니다.
    ///
    /// # Errors
    ///
    /// - `DuplicateModule`: 같은 이름이 이미 있음. 이 경우 훅은 호출되지 않습니다.
    /// - 훅이 반환한 에러 그대로. 모듈은 등록된 상태로 남습니다.
    pub fn register(&mut self, module: Box<dyn Module>, locator: &ServiceLocator) -> CoreResult<()> {
        let name = module.name().to_string();
        if self.modules.contains_key(&name) {
            warn!("Duplicate module registration rejected: {}", name);
            return Err(CoreError::DuplicateModule(name));
        }

        debug!("📦 Registering module: {} v{}", name, module.version());
        self.states.insert(name.clone(), ModuleState::Registered);
        let module = self.modules.entry(name).or_insert(module);

        module.register(locator).map_err(CoreError::from_hook)
    }

    /// 모듈과 그 의존성을 부팅합니다.
    ///
    /// 이미 부팅된 모듈이면 아무것도 하지 않습니다. 의존성은 선언 순서대로
    /// 재귀적으로 부팅되며, 모두 끝난 뒤 이 모듈의 `boot` 훅이 호출됩니다.
    ///
    /// # Errors
    ///
    /// - `ModuleNotFound`: 이 이름 또는 의존성 이름이 등록되지 않음
    /// - `CircularDependency`: 해석 스택 위의 이름을 다시 만남
    /// - 훅이 반환한 에러 그대로
    ///
    /// 실패하면 이 호출이 스택에 올린 모듈은 모두 `Registered`로 돌아갑니다.
    /// 이미 `Booted`가 된 의존성은 되돌리지 않습니다.
    pub fn boot(&mut self, name: &str, locator: &ServiceLocator) -> CoreResult<()> {
        match self.states.get(name) {
            Some(ModuleState::Booted) => return Ok(()),
            Some(ModuleState::Booting) => return Err(self.cycle_error(name)),
            Some(ModuleState::Registered) => {}
            None => return Err(CoreError::ModuleNotFound(name.to_string())),
        }

        let dependencies = self
            .modules
            .get(name)
            .map(|module| module.dependencies().to_vec())
            .unwrap_or_default();

        self.states.insert(name.to_string(), ModuleState::Booting);
        self.stack.push(name.to_string());

        let result = self.boot_in_order(name, &dependencies, locator);

        self.stack.pop();
        match &result {
            Ok(()) => {
                self.states.insert(name.to_string(), ModuleState::Booted);
                self.boot_order.push(name.to_string());
            }
            Err(_) => {
                self.states.insert(name.to_string(), ModuleState::Registered);
            }
        }

        result
    }

    fn boot_in_order(
        &mut self,
        name: &str,
        dependencies: &[String],
        locator: &ServiceLocator,
    ) -> CoreResult<()> {
        for dependency in dependencies {
            self.boot(dependency, locator)?;
        }

        let module = self
            .modules
            .get(name)
            .ok_or_else(|| CoreError::ModuleNotFound(name.to_string()))?;

        info!("🚀 Booting module: {} v{}", name, module.version());
        module.boot(locator).map_err(CoreError::from_hook)
    }

    fn cycle_error(&self, name: &str) -> CoreError {
        let start = self
            .stack
            .iter()
            .position(|active| active == name)
            .unwrap_or(0);
        let mut chain = self.stack[start..].to_vec();
        chain.push(name.to_string());

        warn!("Circular dependency detected: {}", chain.join(" -> "));
        CoreError::CircularDependency { chain }
    }

    /// 등록된 모든 모듈을 등록 순서대로 부팅합니다.
    pub fn boot_all(&mut self, locator: &ServiceLocator) -> CoreResult<()> {
        let names: Vec<String> = self.modules.keys().cloned().collect();
        for name in names {
            self.boot(&name, locator)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> CoreResult<&dyn Module> {
        match self.modules.get(name) {
            Some(module) => Ok(&**module),
            None => Err(CoreError::ModuleNotFound(name.to_string())),
        }
    }

    /// 활성화 플래그 변경 등을 위한 가변 조회
    pub fn get_mut(&mut self, name: &str) -> CoreResult<&mut dyn Module> {
        match self.modules.get_mut(name) {
            Some(module) => Ok(&mut **module),
            None => Err(CoreError::ModuleNotFound(name.to_string())),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// 등록된 모든 모듈 (등록 순서)
    pub fn all(&self) -> &IndexMap<String, Box<dyn Module>> {
        &self.modules
    }

    pub fn state(&self, name: &str) -> Option<ModuleState> {
        self.states.get(name).copied()
    }

    pub fn is_booted(&self, name: &str) -> bool {
        self.state(name) == Some(ModuleState::Booted)
    }

    /// `boot` 훅이 실제로 실행된 순서
    pub fn boot_order(&self) -> &[String] {
        &self.boot_order
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// 등록 순서대로 모듈 상태를 요약합니다.
    pub fn describe(&self) -> Vec<ModuleDescriptor> {
        self.modules
            .iter()
            .map(|(name, module)| ModuleDescriptor {
                name: name.clone(),
                version: module.version().to_string(),
                dependencies: module.dependencies().to_vec(),
                enabled: module.is_enabled(),
                state: self.state(name).unwrap_or(ModuleState::Registered),
            })
            .collect()
    }
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("modules", &self.modules.keys().collect::<Vec<_>>())
            .field("boot_order", &self.boot_order)
            .finish()
    }
}
