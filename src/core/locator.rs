//! # Service Locator - 지연 싱글톤 서비스 컨테이너
//!
//! 문자열 ID로 값이나 팩토리를 등록하고, 팩토리는 첫 요청 시 한 번만 실행하여
//! 결과를 캐싱합니다. 이후 같은 ID에 대한 모든 `get`은 동일한 `Arc`를 반환하므로,
//! 한 호출자가 내부 가변성을 통해 바꾼 상태를 다른 호출자도 그대로 관찰합니다.
//!
//! ## 정의 종류
//!
//! | 정의 | 해석 방식 |
//! |------|-----------|
//! | [`ServiceDefinition::Value`] | 등록된 값을 그대로 반환 |
//! | [`ServiceDefinition::Factory`] | 첫 `get`에서 실행, 결과를 캐싱 |
//!
//! 팩토리 시그니처는 하나로 고정됩니다: `Fn(&ServiceLocator) -> HookResult<T>`.
//! 팩토리는 인자로 받은 로케이터에서 다른 서비스를 꺼내 조립할 수 있습니다.
//!
//! ## 덮어쓰기 규칙 (Last write wins)
//!
//! 같은 ID로 다시 `register`하면 이전 정의와 그 ID의 캐시만 버립니다.
//! 이미 이전 인스턴스를 받아 간 다른 서비스나 호출자에게는 아무것도 전파되지 않으며,
//! 그들은 계속 이전 인스턴스를 들고 있습니다.
//!
//! ## 동시성
//!
//! 내부 맵은 `RwLock`으로 보호되지만 팩토리 실행 중에는 잠금을 쥐지 않습니다.
//! 따라서 두 스레드가 동시에 같은 미해석 ID를 요청하면 팩토리가 두 번 실행될 수 있고,
//! 먼저 캐시에 들어간 값이 양쪽에 반환됩니다. 한 번만 실행되는 보장은 순차 접근에서만 유효합니다.
//! 순환 감지용 해석 스택은 스레드별로 따로 관리되며, 팩토리가 패닉해도 가드가 스택을 정리합니다.

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread::{self, ThreadId};

use log::{debug, trace};

use crate::core::errors::{CoreError, CoreResult, HookResult};

/// 로케이터에 저장되는 타입 소거된 서비스 핸들
pub type SharedService = Arc<dyn Any + Send + Sync>;

/// 타입 소거된 팩토리
pub type ServiceFactory = Arc<dyn Fn(&ServiceLocator) -> HookResult<SharedService> + Send + Sync>;

/// 서비스 정의
#[derive(Clone)]
pub enum ServiceDefinition {
    /// 이미 만들어진 값
    Value(SharedService),
    /// 첫 요청 시 한 번 실행되는 생성 함수
    Factory(ServiceFactory),
}

impl ServiceDefinition {
    /// 값을 `Arc`로 감싸 정의를 만듭니다.
    pub fn value<T: Any + Send + Sync>(value: T) -> Self {
        ServiceDefinition::Value(Arc::new(value))
    }

    /// 이미 공유 중인 `Arc`를 그대로 정의로 사용합니다.
    pub fn shared<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        ServiceDefinition::Value(value)
    }

    /// 타입이 있는 팩토리를 타입 소거된 팩토리로 감쌉니다.
    pub fn factory<T, F>(factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&ServiceLocator) -> HookResult<T> + Send + Sync + 'static,
    {
        ServiceDefinition::Factory(Arc::new(move |locator: &ServiceLocator| {
            factory(locator).map(|value| Arc::new(value) as SharedService)
        }))
    }

    fn kind(&self) -> &'static str {
        match self {
            ServiceDefinition::Value(_) => "value",
            ServiceDefinition::Factory(_) => "factory",
        }
    }
}

impl std::fmt::Debug for ServiceDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind())
    }
}

struct ServiceEntry {
    definition: ServiceDefinition,
    /// 해석된 값. `Value` 정의는 등록 시점에 바로 채워집니다.
    resolved: Option<SharedService>,
    /// 덮어쓰기마다 증가
    revision: u64,
}

/// 문자열 키 기반 싱글톤 서비스 컨테이너
#[derive(Default)]
pub struct ServiceLocator {
    entries: RwLock<HashMap<String, ServiceEntry>>,
    /// 스레드별로 현재 실행 중인 팩토리의 ID (순환 감지용)
    resolving: Mutex<HashMap<ThreadId, Vec<String>>>,
    revisions: AtomicU64,
}

impl ServiceLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 서비스 정의를 등록합니다.
    ///
    /// 같은 ID가 이미 있으면 정의를 교체하고 그 ID의 캐시를 비웁니다.
    pub fn register(&self, id: impl Into<String>, definition: ServiceDefinition) {
        let id = id.into();
        let revision = self.next_revision();
        let resolved = match &definition {
            ServiceDefinition::Value(value) => Some(value.clone()),
            ServiceDefinition::Factory(_) => None,
        };

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let replaced = entries.contains_key(&id);
        debug!(
            "📦 Registering service: {} ({}{})",
            id,
            definition.kind(),
            if replaced { ", replaced" } else { "" }
        );
        entries.insert(
            id,
            ServiceEntry {
                definition,
                resolved,
                revision,
            },
        );
    }

    /// 값을 바로 등록합니다.
    pub fn set<T: Any + Send + Sync>(&self, id: impl Into<String>, value: T) {
        self.register(id, ServiceDefinition::value(value));
    }

    /// 팩토리를 등록합니다.
    pub fn factory<T, F>(&self, id: impl Into<String>, factory: F)
    where
        T: Any + Send + Sync,
        F: Fn(&ServiceLocator) -> HookResult<T> + Send + Sync + 'static,
    {
        self.register(id, ServiceDefinition::factory(factory));
    }

    /// 정의가 존재하는지 확인합니다. 해석 여부와는 무관합니다.
    pub fn has(&self, id: &str) -> bool {
        self.read_entries().contains_key(id)
    }

    /// 이미 해석되어 캐시에 값이 있는지 확인합니다.
    pub fn is_resolved(&self, id: &str) -> bool {
        self.read_entries()
            .get(id)
            .is_some_and(|entry| entry.resolved.is_some())
    }

    /// 등록된 모든 ID (정렬됨)
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.read_entries().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_entries().is_empty()
    }

    /// 서비스를 요청한 타입으로 가져옵니다.
    ///
    /// # Errors
    ///
    /// - `ServiceNotFound`: 정의가 없음
    /// - `ServiceTypeMismatch`: 저장된 값의 타입이 `T`가 아님
    /// - `CircularService`: 팩토리가 해석 중인 ID를 다시 요청함
    /// - 팩토리가 반환한 에러 그대로
    pub fn get<T: Any + Send + Sync>(&self, id: &str) -> CoreResult<Arc<T>> {
        self.get_any(id)?
            .downcast::<T>()
            .map_err(|_| CoreError::ServiceTypeMismatch {
                id: id.to_string(),
                expected: type_name::<T>(),
            })
    }

    /// 서비스를 타입 소거된 핸들로 가져옵니다.
    pub fn get_any(&self, id: &str) -> CoreResult<SharedService> {
        // 캐시 확인
        let (factory, revision) = {
            let entries = self.read_entries();
            let entry = entries
                .get(id)
                .ok_or_else(|| CoreError::ServiceNotFound(id.to_string()))?;

            if let Some(resolved) = &entry.resolved {
                trace!("Service cache hit: {}", id);
                return Ok(resolved.clone());
            }

            match &entry.definition {
                ServiceDefinition::Factory(factory) => (factory.clone(), entry.revision),
                ServiceDefinition::Value(value) => return Ok(value.clone()),
            }
        };

        let produced = {
            let _guard = self.enter_resolution(id)?;
            debug!("Resolving service: {}", id);
            (*factory)(self)
        };
        let produced = produced.map_err(CoreError::from_hook)?;

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match entries.get_mut(id) {
            Some(entry) if entry.revision == revision => {
                // 더블 체크
                if let Some(existing) = &entry.resolved {
                    return Ok(existing.clone());
                }
                entry.resolved = Some(produced.clone());
            }
            _ => debug!("Service {} was redefined while resolving; result not cached", id),
        }

        Ok(produced)
    }

    fn enter_resolution(&self, id: &str) -> CoreResult<ResolutionGuard<'_>> {
        let thread = thread::current().id();
        let mut resolving = self.resolving.lock().unwrap_or_else(PoisonError::into_inner);
        let stack = resolving.entry(thread).or_default();
        if let Some(start) = stack.iter().position(|active| active == id) {
            let mut chain = stack[start..].to_vec();
            chain.push(id.to_string());
            return Err(CoreError::CircularService { chain });
        }
        stack.push(id.to_string());

        Ok(ResolutionGuard {
            locator: self,
            thread,
            id: id.to_string(),
        })
    }

    fn leave_resolution(&self, thread: ThreadId, id: &str) {
        let mut resolving = self.resolving.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(stack) = resolving.get_mut(&thread) {
            if let Some(position) = stack.iter().rposition(|active| active == id) {
                stack.remove(position);
            }
            if stack.is_empty() {
                resolving.remove(&thread);
            }
        }
    }

    fn next_revision(&self) -> u64 {
        self.revisions.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn read_entries(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, ServiceEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// 팩토리 실행 동안 해석 스택에 ID를 올려 두고, 정상 반환이든 패닉이든 drop 시 내립니다.
struct ResolutionGuard<'a> {
    locator: &'a ServiceLocator,
    thread: ThreadId,
    id: String,
}

impl Drop for ResolutionGuard<'_> {
    fn drop(&mut self) {
        self.locator.leave_resolution(self.thread, &self.id);
    }
}

impl std::fmt::Debug for ServiceLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceLocator")
            .field("ids", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Debug, Default)]
    struct Lexicon {
        words: Mutex<Vec<String>>,
    }

    #[test]
    fn test_factory_invoked_once() {
        let locator = ServiceLocator::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        locator.factory("svc", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Lexicon::default())
        });

        let first = locator.get::<Lexicon>("svc").unwrap();
        let second = locator.get::<Lexicon>("svc").unwrap();
        let third = locator.get::<Lexicon>("svc").unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&second, &third));
    }

    #[test]
    fn test_mutation_visible_to_every_caller() {
        let locator = ServiceLocator::new();
        locator.factory("lexicon", |_| Ok(Lexicon::default()));

        let writer = locator.get::<Lexicon>("lexicon").unwrap();
        writer.words.lock().unwrap().push("كتاب".to_string());

        let reader = locator.get::<Lexicon>("lexicon").unwrap();
        assert_eq!(reader.words.lock().unwrap().as_slice(), ["كتاب"]);
    }

    #[test]
    fn test_missing_service_is_not_found() {
        let locator = ServiceLocator::new();

        let error = locator.get_any("missing").unwrap_err();

        assert!(error.is_service_not_found());
        assert!(matches!(error, CoreError::ServiceNotFound(ref id) if id == "missing"));
    }

    #[test]
    fn test_value_returned_as_is() {
        let locator = ServiceLocator::new();
        let shared = Arc::new(String::from("ar"));
        locator.register("locale", ServiceDefinition::shared(shared.clone()));

        let resolved = locator.get::<String>("locale").unwrap();

        assert!(Arc::ptr_eq(&shared, &resolved));
        assert!(locator.has("locale"));
        assert!(locator.is_resolved("locale"));
    }

    #[test]
    fn test_has_is_true_before_resolution() {
        let locator = ServiceLocator::new();
        locator.factory("lazy", |_| Ok(1u32));

        assert!(locator.has("lazy"));
        assert!(!locator.is_resolved("lazy"));

        locator.get::<u32>("lazy").unwrap();
        assert!(locator.is_resolved("lazy"));
    }

    #[test]
    fn test_overwrite_invalidates_cache() {
        let locator = ServiceLocator::new();
        locator.factory("greeting", |_| Ok(String::from("marhaba")));
        let old = locator.get::<String>("greeting").unwrap();

        locator.factory("greeting", |_| Ok(String::from("ahlan")));
        let new = locator.get::<String>("greeting").unwrap();

        assert_eq!(new.as_str(), "ahlan");
        // 이전 인스턴스를 들고 있던 쪽에는 전파되지 않음
        assert_eq!(old.as_str(), "marhaba");
    }

    #[test]
    fn test_overwrite_does_not_propagate_to_dependents() {
        let locator = ServiceLocator::new();
        locator.set("separator", String::from("-"));
        locator.factory("joiner", |l| Ok(l.get::<String>("separator")?.as_ref().clone()));
        let joiner = locator.get::<String>("joiner").unwrap();

        locator.set("separator", String::from("+"));

        assert_eq!(locator.get::<String>("joiner").unwrap().as_str(), "-");
        assert!(Arc::ptr_eq(&joiner, &locator.get::<String>("joiner").unwrap()));
    }

    #[test]
    fn test_factory_receives_locator() {
        let locator = ServiceLocator::new();
        locator.set("prefix", String::from("al"));
        locator.factory("definite", |l| {
            let prefix = l.get::<String>("prefix")?;
            Ok(format!("{}-kitab", prefix))
        });

        assert_eq!(locator.get::<String>("definite").unwrap().as_str(), "al-kitab");
    }

    #[test]
    fn test_nested_not_found_keeps_its_kind() {
        let locator = ServiceLocator::new();
        locator.factory("stemmer", |l| Ok(l.get::<String>("roots")?.len()));

        let error = locator.get::<usize>("stemmer").unwrap_err();

        assert!(matches!(error, CoreError::ServiceNotFound(ref id) if id == "roots"));
        assert!(!locator.is_resolved("stemmer"));
    }

    #[test]
    fn test_factory_error_propagates_and_retries() {
        let locator = ServiceLocator::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        locator.factory("flaky", move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err("dictionary unavailable".into());
            }
            Ok(7u8)
        });

        let error = locator.get::<u8>("flaky").unwrap_err();
        assert_eq!(error.to_string(), "dictionary unavailable");

        assert_eq!(*locator.get::<u8>("flaky").unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_type_mismatch() {
        let locator = ServiceLocator::new();
        locator.set("count", 3u32);

        let error = locator.get::<String>("count").unwrap_err();

        assert!(matches!(
            error,
            CoreError::ServiceTypeMismatch { ref id, .. } if id == "count"
        ));
    }

    #[test]
    fn test_self_referencing_factory_is_circular() {
        let locator = ServiceLocator::new();
        locator.factory("a", |l| Ok(*l.get::<u8>("b")?));
        locator.factory("b", |l| Ok(*l.get::<u8>("a")?));

        let error = locator.get::<u8>("a").unwrap_err();

        assert_eq!(
            error.cycle_chain().unwrap(),
            ["a".to_string(), "b".to_string(), "a".to_string()]
        );
        // 실패 후 해석 스택이 비워져 있어야 함
        locator.set("b", 1u8);
        assert_eq!(*locator.get::<u8>("a").unwrap(), 1);
    }

    #[test]
    fn test_concurrent_first_resolution_is_not_circular() {
        let locator = Arc::new(ServiceLocator::new());
        locator.factory("slow", |_| {
            thread::sleep(std::time::Duration::from_millis(200));
            Ok(5u8)
        });

        let background = {
            let locator = locator.clone();
            thread::spawn(move || locator.get::<u8>("slow").map(|value| *value))
        };
        thread::sleep(std::time::Duration::from_millis(50));
        let foreground = locator.get::<u8>("slow").map(|value| *value);

        assert_eq!(foreground.unwrap(), 5);
        assert_eq!(background.join().unwrap().unwrap(), 5);
        assert!(locator.is_resolved("slow"));
    }

    #[test]
    fn test_panicking_factory_leaves_no_stale_resolution() {
        let locator = ServiceLocator::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        locator.factory("volatile", move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("corrupt dictionary");
            }
            Ok(1u8)
        });

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            locator.get::<u8>("volatile")
        }));
        assert!(outcome.is_err());

        assert_eq!(*locator.get::<u8>("volatile").unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_ids_sorted() {
        let locator = ServiceLocator::new();
        locator.set("tokenizer", ());
        locator.set("calendar", ());

        assert_eq!(locator.ids(), vec!["calendar".to_string(), "tokenizer".to_string()]);
        assert_eq!(locator.len(), 2);
    }
}
