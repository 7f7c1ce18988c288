//! 기동 과정 터미널 출력
//!
//! 레지스트리 초기화 단계와 서버 기동 정보를 눈에 띄게 출력합니다.
//! 로그 레벨과 무관하게 항상 표준 출력에 쓰입니다.

const BOX_WIDTH: usize = 52;

/// 박스로 둘러싼 제목을 출력합니다.
///
/// ```text
/// ╔════════════════════════════════════════════════════╗
/// ║            🔄 INITIALIZING SERVICE REGISTRY         ║
/// ╚════════════════════════════════════════════════════╝
/// ```
pub fn print_boxed_title(title: &str) {
    println!("{}", boxed_title(title));
}

fn boxed_title(title: &str) -> String {
    let border = "═".repeat(BOX_WIDTH);
    format!(
        "╔{border}╗\n║{:^width$}║\n╚{border}╝",
        title,
        width = BOX_WIDTH - 1,
        border = border
    )
}

pub fn print_step_start(step: u8, description: &str) {
    println!("→ Step {}: {}", step, description);
}

pub fn print_step_complete(step: u8, description: &str, count: usize) {
    println!("✓ Step {}: {} ({} components)", step, description, count);
}

pub fn print_sub_task(name: &str, status: &str) {
    println!("   ├─ {:<24} {}", name, status);
}

pub fn print_final_summary(repositories: usize, services: usize) {
    println!();
    print_boxed_title("🎉 SERVICE REGISTRY READY");
    println!("   📦 Repositories: {}", repositories);
    println!("   🔧 Services:     {}", services);
    println!("   🧩 Total:        {}", repositories + services);
    println!();
}

/// 서버 주소와 주요 엔드포인트를 출력합니다.
pub fn print_server_banner(bind_address: &str) {
    print_boxed_title("✈️  TRAVEL SHARE BACKEND");
    println!("   🌐 REST API:  http://{}", bind_address);
    println!("   💓 Health:    http://{}/health", bind_address);
    println!("   📡 WebSocket: ws://{}/socket", bind_address);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxed_title_has_three_lines() {
        let rendered = boxed_title("READY");
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with('╔'));
        assert!(lines[1].contains("READY"));
        assert!(lines[2].ends_with('╝'));
    }
}
