//! 터미널 출력 포맷팅 유틸리티
//!
//! 부트스트랩 과정에서 사용되는 터미널 출력 함수들을 제공합니다.
//! `BootConfig::show_summary`가 켜져 있을 때만 호출됩니다.

/// 박스 내부 너비
const CONTENT_WIDTH: usize = 50;

/// 박스 형태로 둘러싸인 제목을 만듭니다
///
/// ```text
/// ╔══════════════════════════════════════════════════╗
/// ║             🔄 BOOTSTRAPPING MODULES             ║
/// ╚══════════════════════════════════════════════════╝
/// ```
pub fn boxed_title(title: &str) -> String {
    let border = "═".repeat(CONTENT_WIDTH);
    format!(
        "╔{border}╗\n║{title:^width$}║\n╚{border}╝",
        width = CONTENT_WIDTH
    )
}

/// 박스 형태로 둘러싸인 제목을 출력합니다
pub fn print_boxed_title(title: &str) {
    println!("{}", boxed_title(title));
}

/// 진행 단계 시작을 표시합니다
///
/// ```text
/// → Step 1: Registering modules
/// ```
pub fn print_step_start(step: u8, description: &str) {
    println!("→ Step {}: {}", step, description);
}

/// 진행 단계 완료를 처리된 항목 수와 함께 표시합니다
pub fn print_step_complete(step: u8, description: &str, count: usize) {
    println!("✓ Step {}: {} ({} items)", step, description, count);
}

/// 서브 작업의 상태를 표시합니다
///
/// ```text
///    ├─ tokenizer: ✓ Booted
/// ```
pub fn print_sub_task(name: &str, status: &str) {
    println!("   ├─ {}: {}", name, status);
}

/// 부팅 완료 요약을 출력합니다
///
/// ```text
/// ╔══════════════════════════════════════════════════╗
/// ║            🎉 TOOLKIT CORE INITIALIZED           ║
/// ╚══════════════════════════════════════════════════╝
///    📦 Modules: 3
///    🔧 Services: 5
/// ```
pub fn print_final_summary(modules: usize, services: usize) {
    println!();
    print_boxed_title("🎉 TOOLKIT CORE INITIALIZED");
    println!("   📦 Modules: {}", modules);
    println!("   🔧 Services: {}", services);
    println!();
}
