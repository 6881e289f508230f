use std::io::stdout;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use folio_core::config::SiteConfig;
use folio_core::perf::FpsMeter;
use folio_core::scroll::{ScrollObserver, ScrollSample};
use folio_core::theme::ThemeStore;
use folio_core::tracking::PageTracker;
use folio_core::Stage;
use folio_protocol::{ScrollView, ThemeMode, ThemeToken, TypewriterFrame};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph},
};

use crate::page::{BodyLine, Page};
use crate::palette::resolve;
use crate::store::FileStore;

/// Terminal rows stand in for this many CSS pixels when comparing against
/// the configured scroll thresholds.
const ROW_PX: f64 = 20.0;

const PAGE_PATH: &str = "/";

/// Longest the loop sleeps waiting for input; keeps counters smooth.
const MAX_IDLE: Duration = Duration::from_millis(50);

struct View<'a> {
    page: &'a Page,
    offset: usize,
    headline: TypewriterFrame,
    scroll: ScrollView,
    theme: ThemeMode,
    now: Duration,
    fps: u32,
}

impl View<'_> {
    fn color(&self, token: ThemeToken) -> ratatui::style::Color {
        resolve(token, self.theme)
    }
}

fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

pub fn run(site: &SiteConfig, mut store: FileStore) -> Result<()> {
    let mut theme = ThemeStore::load(&mut store, None).mode();
    let visits = PageTracker::new(&mut store).track_view(PAGE_PATH, epoch_ms());
    tracing::info!(visits, %theme, "starting folio");

    let mut stage = Stage::new();
    let headline = stage.mount(site.typewriter.clone());
    let mut observer = ScrollObserver::new(site.scroll);
    let mut shown = false;
    let back_to_top_log = observer.subscribe(move |view| {
        if view.back_to_top_visible != shown {
            shown = view.back_to_top_visible;
            tracing::debug!(shown, progress = view.progress_percent, "back-to-top toggled");
        }
    });
    let mut page = Page::new(site);

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let start = Instant::now();
    let mut offset: usize = 0;
    let mut fps = FpsMeter::new(Duration::ZERO);

    let result: Result<()> = (|| {
        loop {
            let now = start.elapsed();
            stage.advance_to(now);

            let size = terminal.size()?;
            // nav bar, headline and status line are fixed
            let body_rows = usize::from(size.height.saturating_sub(3));
            let max_offset = page.max_offset(body_rows);
            offset = offset.min(max_offset);

            let scroll = observer.on_scroll(ScrollSample::new(
                offset as f64 * ROW_PX,
                max_offset as f64 * ROW_PX,
            ));
            page.observe(offset..offset + body_rows, now);
            fps.frame(now);

            let view = View {
                page: &page,
                offset,
                headline: stage.frame(headline).unwrap_or_else(|| TypewriterFrame {
                    text: String::new(),
                    cursor_visible: false,
                    cursor: None,
                    phase: Default::default(),
                }),
                scroll,
                theme,
                now,
                fps: fps.fps(),
            };
            terminal.draw(|frame| draw(frame, &view))?;

            let wait = stage
                .next_deadline()
                .map_or(MAX_IDLE, |deadline| deadline.saturating_sub(start.elapsed()))
                .min(MAX_IDLE);
            if !event::poll(wait)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Down | KeyCode::Char('j') => offset = (offset + 1).min(max_offset),
                    KeyCode::Up | KeyCode::Char('k') => offset = offset.saturating_sub(1),
                    KeyCode::PageDown | KeyCode::Char(' ') => {
                        offset = (offset + body_rows.max(1)).min(max_offset);
                    }
                    KeyCode::PageUp => offset = offset.saturating_sub(body_rows.max(1)),
                    KeyCode::Home | KeyCode::Char('g') => offset = 0,
                    KeyCode::End | KeyCode::Char('G') => offset = max_offset,
                    KeyCode::Char('t') => {
                        theme = ThemeStore::load(&mut store, None).toggle();
                    }
                    _ => {}
                },
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollDown => offset = (offset + 3).min(max_offset),
                    MouseEventKind::ScrollUp => offset = offset.saturating_sub(3),
                    _ => {}
                },
                _ => {}
            }
        }
        Ok(())
    })();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    observer.unsubscribe(back_to_top_log);
    stage.unmount(headline);
    let spent = start.elapsed().as_millis() as u64;
    let total = PageTracker::new(&mut store).record_time(PAGE_PATH, spent);
    tracing::info!(spent_ms = spent, total_ms = total, "session ended");

    result
}

fn draw(frame: &mut Frame, view: &View) {
    let area = frame.area();
    let background = Style::default()
        .bg(view.color(ThemeToken::Background))
        .fg(view.color(ThemeToken::TextPrimary));
    frame.render_widget(Paragraph::new("").style(background), area);

    draw_nav(frame, view, Rect::new(area.x, area.y, area.width, 1));
    draw_headline(frame, view, Rect::new(area.x, area.y + 1, area.width, 1));

    let body = Rect::new(
        area.x,
        area.y + 2,
        area.width,
        area.height.saturating_sub(3),
    );
    draw_body(frame, view, body);

    let status_y = area.y + area.height.saturating_sub(1);
    draw_status(frame, view, Rect::new(area.x, status_y, area.width, 1));
}

fn draw_nav(frame: &mut Frame, view: &View, area: Rect) {
    let token = if view.scroll.nav_scrolled {
        ThemeToken::NavBackgroundScrolled
    } else {
        ThemeToken::NavBackground
    };
    let mut style = Style::default()
        .bg(view.color(token))
        .fg(view.color(ThemeToken::NavText));
    if view.scroll.nav_scrolled {
        style = style.add_modifier(Modifier::BOLD);
    }
    let title = format!(" folio  ·  Home  Projects  About  Stats   [{}]", view.theme);
    frame.render_widget(Paragraph::new(title).style(style), area);
}

fn draw_headline(frame: &mut Frame, view: &View, area: Rect) {
    let mut spans = vec![
        Span::raw(" "),
        Span::styled(
            view.headline.text.clone(),
            Style::default()
                .fg(view.color(ThemeToken::Headline))
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(glyph) = view.headline.cursor
        && view.headline.cursor_visible
    {
        spans.push(Span::styled(
            glyph.to_string(),
            Style::default().fg(view.color(ThemeToken::Cursor)),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn counters_line(view: &View) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for counter in view.page.counters() {
        spans.push(Span::styled(
            counter.display(),
            Style::default()
                .fg(view.color(ThemeToken::CounterValue))
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" {}   ", counter.config().label),
            Style::default().fg(view.color(ThemeToken::CounterLabel)),
        ));
    }
    Line::from(spans)
}

fn draw_body(frame: &mut Frame, view: &View, area: Rect) {
    let rows = usize::from(area.height);
    let lines: Vec<Line> = view
        .page
        .lines()
        .iter()
        .skip(view.offset)
        .take(rows)
        .map(|line| match line {
            BodyLine::Blank => Line::raw(""),
            BodyLine::Counters => counters_line(view),
            BodyLine::Title { text, .. } => Line::styled(
                format!(" {text}"),
                Style::default()
                    .fg(view.color(ThemeToken::TextPrimary))
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ),
            BodyLine::Text { section, text } if view.page.is_section_shown(*section, view.now) => {
                Line::styled(
                    format!("   {text}"),
                    Style::default().fg(view.color(ThemeToken::TextSecondary)),
                )
            }
            // Still waiting for its entrance slot.
            BodyLine::Text { .. } => Line::raw(""),
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_status(frame: &mut Frame, view: &View, area: Rect) {
    let hint_width = 34.min(area.width);
    let gauge_area = Rect::new(area.x, area.y, area.width.saturating_sub(hint_width), 1);
    let hint_area = Rect::new(
        area.x + gauge_area.width,
        area.y,
        area.width - gauge_area.width,
        1,
    );

    let ratio = (view.scroll.progress_percent / 100.0).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(view.color(ThemeToken::ProgressFill))
                .bg(view.color(ThemeToken::ProgressTrack)),
        )
        .ratio(ratio)
        .label(format!("{:.0}%  {} fps", view.scroll.progress_percent, view.fps));
    frame.render_widget(gauge, gauge_area);

    let hint = if view.scroll.back_to_top_visible {
        Span::styled(
            " ↑ top (g) · t theme · q quit ",
            Style::default()
                .fg(view.color(ThemeToken::Background))
                .bg(view.color(ThemeToken::BackToTop)),
        )
    } else {
        Span::styled(
            " j/k scroll · t theme · q quit ",
            Style::default().fg(view.color(ThemeToken::TextMuted)),
        )
    };
    frame.render_widget(Paragraph::new(Line::from(hint)), hint_area);
}
