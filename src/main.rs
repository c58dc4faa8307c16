//! 툴킷 코어 부트스트랩 실행 파일
//!
//! 환경 설정을 로드하고 수집된 모든 모듈을 전역 컨텍스트로 부팅한 뒤
//! 모듈 상태를 로그로 남깁니다.

use std::process::ExitCode;

use env_logger::Env;
use log::{debug, error, info};

use arabic_toolkit::config::load_env_file;
use arabic_toolkit::core::bootstrap::{Bootstrapper, global};
use arabic_toolkit::core::discovered_modules;

fn main() -> ExitCode {
    // 환경 설정 및 로깅 초기화
    init_logging();
    let env_file = load_env_file();

    info!("🚀 툴킷 코어 시작중...");

    let bootstrapper = Bootstrapper::from_env();
    let context = match global::init_with(&bootstrapper, discovered_modules()) {
        Ok(context) => context,
        Err(e) => {
            error!("모듈 부팅 실패: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for descriptor in context.registry().describe() {
        match serde_json::to_string(&descriptor) {
            Ok(line) => debug!("{}", line),
            Err(e) => error!("모듈 정보 직렬화 실패: {}", e),
        }
    }

    info!(
        "✅ 부팅 순서: {}",
        context.registry().boot_order().join(" -> ")
    );
    info!("✅ 등록된 서비스: {}", context.locator().ids().join(", "));
    match env_file {
        Some(path) => info!("✅ 환경 파일: {}", path.display()),
        None => info!("✅ 환경 파일 없음, 프로세스 환경 변수 사용"),
    }

    ExitCode::SUCCESS
}

/// 로깅 시스템을 초기화합니다
///
/// # Environment Variables
///
/// * `RUST_LOG` - 로깅 레벨 설정 (기본값: "info")
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
}
