use folio_protocol::{ThemeMode, ThemeToken};
use ratatui::style::Color;

pub fn resolve(token: ThemeToken, mode: ThemeMode) -> Color {
    match mode {
        ThemeMode::Dark => resolve_dark(token),
        ThemeMode::Light => resolve_light(token),
    }
}

fn resolve_dark(token: ThemeToken) -> Color {
    use ThemeToken::*;
    match token {
        Background => Color::Rgb(0x11, 0x18, 0x27),
        Surface => Color::Rgb(0x1f, 0x29, 0x37),
        Border => Color::Rgb(0x37, 0x41, 0x51),
        TextPrimary => Color::Rgb(0xf9, 0xfa, 0xfb),
        TextSecondary => Color::Rgb(0xd1, 0xd5, 0xdb),
        TextMuted => Color::Rgb(0x9c, 0xa3, 0xaf),
        NavBackground => Color::Rgb(0x11, 0x18, 0x27),
        NavBackgroundScrolled => Color::Rgb(0x1f, 0x29, 0x37),
        NavText => Color::Rgb(0xf9, 0xfa, 0xfb),
        Headline => Color::Rgb(0x60, 0xa5, 0xfa),
        Cursor => Color::Rgb(0x3b, 0x82, 0xf6),
        CounterValue => Color::Rgb(0x60, 0xa5, 0xfa),
        CounterLabel => Color::Rgb(0x9c, 0xa3, 0xaf),
        ProgressTrack => Color::Rgb(0x37, 0x41, 0x51),
        ProgressFill => Color::Rgb(0x3b, 0x82, 0xf6),
        BackToTop => Color::Rgb(0x25, 0x63, 0xeb),
    }
}

fn resolve_light(token: ThemeToken) -> Color {
    use ThemeToken::*;
    match token {
        Background => Color::Rgb(0xff, 0xff, 0xff),
        Surface => Color::Rgb(0xf3, 0xf4, 0xf6),
        Border => Color::Rgb(0xe5, 0xe7, 0xeb),
        TextPrimary => Color::Rgb(0x11, 0x18, 0x27),
        TextSecondary => Color::Rgb(0x37, 0x41, 0x51),
        TextMuted => Color::Rgb(0x6b, 0x72, 0x80),
        NavBackground => Color::Rgb(0xff, 0xff, 0xff),
        NavBackgroundScrolled => Color::Rgb(0xf3, 0xf4, 0xf6),
        NavText => Color::Rgb(0x11, 0x18, 0x27),
        Headline => Color::Rgb(0x25, 0x63, 0xeb),
        Cursor => Color::Rgb(0x3b, 0x82, 0xf6),
        CounterValue => Color::Rgb(0x25, 0x63, 0xeb),
        CounterLabel => Color::Rgb(0x6b, 0x72, 0x80),
        ProgressTrack => Color::Rgb(0xe5, 0xe7, 0xeb),
        ProgressFill => Color::Rgb(0x3b, 0x82, 0xf6),
        BackToTop => Color::Rgb(0x25, 0x63, 0xeb),
    }
}
