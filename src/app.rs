//! Interactive visualizer - owns navigation, insight and render state and
//! runs the terminal event loop.
//!
//! Every committed state change redraws the whole frame from scratch.

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::config::{AppConfig, DisplayConfig, MIN_WIDTH};
use crate::error::Result;
use crate::insight::{ExplanationService, InsightCoordinator, InsightState};
use crate::navigation::NavigationController;
use crate::render::{RenderSurface, box_text, display_width, pad, segment_bar, wrap};
use crate::stage::Stage;

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";
const BOLD: &str = "\x1B[1m";
const RESET: &str = "\x1B[0m";

/// A line of user input, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Go to the next stage.
    Next,
    /// Go to the previous stage.
    Prev,
    /// Leave the visualizer.
    Quit,
    /// Anything else.
    Unknown(String),
}

impl Command {
    /// Parse one input line. An empty line means "next".
    pub fn parse(line: &str) -> Self {
        match line.trim().to_lowercase().as_str() {
            "" | "n" | "next" => Command::Next,
            "p" | "prev" | "b" | "back" => Command::Prev,
            "q" | "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(line.trim().to_string()),
        }
    }
}

/// The whole application state.
pub struct Visualizer<S> {
    nav: NavigationController,
    insight: InsightCoordinator<S>,
    surface: RenderSurface,
    display: DisplayConfig,
    hint: Option<String>,
}

impl<S: ExplanationService> Visualizer<S> {
    /// Build a visualizer positioned on the first stage.
    pub fn new(service: Arc<S>, config: &AppConfig) -> Self {
        Self {
            nav: NavigationController::new(),
            insight: InsightCoordinator::new(service, &config.insight),
            surface: RenderSurface::new(),
            display: config.display.clone(),
            hint: None,
        }
    }

    /// Activate the first stage. Must run inside a tokio runtime.
    pub fn start(&mut self) {
        self.nav
            .announce(&mut (&mut self.insight, &mut self.surface));
    }

    /// Move to the next stage, if any.
    pub fn next(&mut self) -> bool {
        self.nav
            .advance_with(&mut (&mut self.insight, &mut self.surface))
    }

    /// Move to the previous stage, if any.
    pub fn prev(&mut self) -> bool {
        self.nav
            .retreat_with(&mut (&mut self.insight, &mut self.surface))
    }

    /// Active stage.
    pub fn current(&self) -> &'static Stage {
        self.nav.current()
    }

    /// Navigation state.
    pub fn navigation(&self) -> &NavigationController {
        &self.nav
    }

    /// Insight coordinator.
    pub fn insight(&self) -> &InsightCoordinator<S> {
        &self.insight
    }

    /// Mutable insight coordinator, for driving events outside [`run`](Self::run).
    pub fn insight_mut(&mut self) -> &mut InsightCoordinator<S> {
        &mut self.insight
    }

    /// Render surface.
    pub fn surface(&self) -> &RenderSurface {
        &self.surface
    }

    fn bold(&self, text: &str) -> String {
        if self.display.color {
            format!("{BOLD}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn insight_body(state: &InsightState) -> String {
        if state.loading {
            "● ● ●".to_string()
        } else {
            state.text.clone().unwrap_or_default()
        }
    }

    /// Compose the full frame for the current state.
    ///
    /// Widths below the configured minimum are drawn at the minimum.
    pub fn frame(&self) -> String {
        let width = self.display.width.max(MIN_WIDTH);
        let stage = self.nav.current();
        let mut out: Vec<String> = Vec::new();

        // Header
        out.push(format!("╔{}╗", "═".repeat(width - 2)));
        out.push(format!(
            "║ {} ║",
            pad(&self.bold("LLM Inside: 核心原理"), width - 4 + self.style_overhead())
        ));
        out.push(format!("║ {} ║", pad("Deep Dive Visualization", width - 4)));
        out.push(format!("╚{}╝", "═".repeat(width - 2)));
        out.push(String::new());

        // Scene
        out.push(format!("  [ {} ]", self.surface.stage_tag_line()));
        out.push(String::new());
        out.push(self.surface.scene());
        out.push(String::new());
        out.push("─".repeat(width));

        // Stage copy
        out.push(self.bold(stage.title));
        out.push(stage.subtitle.to_uppercase());
        out.push(String::new());
        out.extend(wrap(stage.description, width));
        out.push(String::new());

        // Insight
        out.push(box_text(
            &Self::insight_body(self.insight.state()),
            "✦ Gemini 深度解析",
            width,
        ));

        // Technical specifications
        if !stage.specs.is_empty() {
            out.push(String::new());
            out.push("TECHNICAL SPECIFICATIONS".to_string());
            for chip in stage.specs {
                out.push(format!("  · {}: {}", chip.label, chip.value));
            }
        }

        // Navigation
        out.push(String::new());
        let prev = if self.nav.is_first() { "  ·  " } else { "[◄ p]" };
        let next = if self.nav.is_last() { "  ·  " } else { "[n ►]" };
        out.push(format!(
            "{prev}  {}  {next}   {}/{}  {:>3.0}%",
            segment_bar(self.nav.index() + 1, self.nav.len(), 6),
            self.nav.index() + 1,
            self.nav.len(),
            self.nav.progress() * 100.0
        ));
        out.push("Enter/n: next   p: previous   q: quit".to_string());
        if let Some(hint) = &self.hint {
            out.push(hint.clone());
        }

        out.join("\n")
    }

    fn style_overhead(&self) -> usize {
        if self.display.color {
            display_width(BOLD) + display_width(RESET)
        } else {
            0
        }
    }

    fn draw<W: Write>(&self, output: &mut W) -> Result<()> {
        if self.display.color {
            write!(output, "{CLEAR_SCREEN}")?;
        }
        writeln!(output, "{}", self.frame())?;
        output.flush()?;
        Ok(())
    }

    /// Run the interactive loop until `q` or end of input.
    ///
    /// Multiplexes input lines and insight events on the current task and
    /// redraws after every state change.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        self.start();
        self.draw(&mut output)?;

        let mut lines = input.lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    match Command::parse(&line) {
                        Command::Quit => break,
                        Command::Next => {
                            self.hint = None;
                            self.next();
                        }
                        Command::Prev => {
                            self.hint = None;
                            self.prev();
                        }
                        Command::Unknown(other) => {
                            self.hint = Some(format!("unknown command: {other:?}"));
                        }
                    }
                    self.draw(&mut output)?;
                }
                Some(event) = self.insight.next_event() => {
                    if self.insight.apply(event) {
                        self.draw(&mut output)?;
                    }
                }
            }
        }

        tracing::debug!(stage = %self.nav.current().id, "visualizer exited");
        Ok(())
    }
}
