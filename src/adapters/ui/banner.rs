//! Welcome banner: "CRONSCRIBE" in figlet's standard font with a colour gradient.

use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{Write, stdout};

/// Deep Indigo (#3f51b5).
const INDIGO: (u8, u8, u8) = (0x3f, 0x51, 0xb5);
/// Teal (#26a69a).
const TEAL: (u8, u8, u8) = (0x26, 0xa6, 0x9a);

/// Linear interpolation between two RGB colors. `t` in [0.0, 1.0].
fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let r = (f64::from(a.0) * (1.0 - t) + f64::from(b.0) * t).round() as u8;
    let g = (f64::from(a.1) * (1.0 - t) + f64::from(b.1) * t).round() as u8;
    let bl = (f64::from(a.2) * (1.0 - t) + f64::from(b.2) * t).round() as u8;
    (r, g, bl)
}

/// Render the banner art. Falls back to plain text if the font cannot be loaded.
fn banner_lines() -> Vec<String> {
    let Ok(font) = FIGfont::standard() else {
        return vec!["CRONSCRIBE".to_string()];
    };
    match font.convert("CRONSCRIBE") {
        Some(figure) => figure.to_string().lines().map(str::to_string).collect(),
        None => vec!["CRONSCRIBE".to_string()],
    }
}

/// Prints the banner with an Indigo-to-Teal gradient, then version and tagline.
pub fn print_welcome() {
    let mut out = stdout();
    let lines = banner_lines();
    let total = lines.len().max(1);

    for (i, line) in lines.iter().enumerate() {
        let t = if total <= 1 {
            1.0
        } else {
            i as f64 / (total - 1) as f64
        };
        let (r, g, b) = lerp_rgb(INDIGO, TEAL, t);
        let _ = out.execute(SetForegroundColor(Color::Rgb { r, g, b }));
        let _ = out.execute(Print(line));
        let _ = out.execute(Print("\r\n"));
        let _ = out.execute(ResetColor);
    }

    let version = env!("CARGO_PKG_VERSION");
    let _ = out.execute(SetForegroundColor(Color::Rgb {
        r: TEAL.0,
        g: TEAL.1,
        b: TEAL.2,
    }));
    let _ = out.execute(Print(format!("v{}\r\n", version)));
    let _ = out.execute(Print("AI-Powered CRON Expression Generator\r\n\r\n"));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}
