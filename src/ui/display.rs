//! Access instructions for an active share

use console::Style;

use crate::session::Session;

/// UNC path of `share` on `host`
pub fn unc_path(host: &str, share: &str) -> String {
    format!(r"\\{host}\{share}")
}

/// Lines shown while a share is active, without styling
pub fn access_lines(session: &Session, addresses: &[String]) -> Vec<String> {
    let mut lines = vec![
        format!("Sharing {} as {}", session.drive_path, session.share_name),
        format!(
            "Local access:  {}",
            unc_path("localhost", &session.share_name)
        ),
        format!("Remote access: {}", unc_path(&session.ip, &session.share_name)),
    ];

    let others: Vec<&String> = addresses.iter().filter(|a| **a != session.ip).collect();
    if !others.is_empty() {
        lines.push("Also reachable at:".to_string());
        for address in others {
            lines.push(format!("  {}", unc_path(address, &session.share_name)));
        }
    }

    lines.push(format!("Username: {}", session.credential.username));
    lines.push(format!("Password: {}", session.credential.password));
    lines
}

pub fn print_access_instructions(session: &Session, addresses: &[String]) {
    let bold = Style::new().bold();
    let green = Style::new().bold().green();

    println!();
    for line in access_lines(session, addresses) {
        match line.split_once(": ") {
            Some((label, value)) if !label.starts_with(' ') => {
                println!("{} {}", bold.apply_to(format!("{label}:")), value.trim_start());
            }
            _ => println!("{line}"),
        }
    }
    println!();
    println!("{}", green.apply_to("Press Ctrl+K to stop sharing..."));
}
