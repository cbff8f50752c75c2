use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{KeyEventKind, KeyModifiers};
use log::{debug, error, info};
use ratatui::{
    Terminal,
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::document::{LoadOptions, load_document};
use crate::event_source::{Event, EventSource, KeyCode, KeyEvent};
use crate::view::{CellClass, Command, Frame, FrameCell, SearchDirection, Viewport, Workspace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Search(SearchDirection),
    PageNumber,
}

const MAX_SEARCH_LENGTH: usize = 1024;
const MAX_PAGE_NUMBER_LENGTH: usize = 16;

impl PromptKind {
    /// Longest input the prompt accepts, in characters
    fn max_len(self) -> usize {
        match self {
            PromptKind::Search(_) => MAX_SEARCH_LENGTH,
            PromptKind::PageNumber => MAX_PAGE_NUMBER_LENGTH,
        }
    }

    fn symbol(self) -> char {
        match self {
            PromptKind::Search(SearchDirection::Forward) => '/',
            PromptKind::Search(SearchDirection::Backward) => '?',
            PromptKind::PageNumber => ':',
        }
    }
}

/// A line being typed into the status row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

pub struct App {
    workspace: Workspace,
    prompt: Option<Prompt>,
    /// One-shot message shown in the status row until the next key
    notice: Option<String>,
}

impl App {
    pub fn new(workspace: Workspace) -> Self {
        Self {
            workspace,
            prompt: None,
            notice: None,
        }
    }

    /// Open every path. Files that fail to load are logged and skipped;
    /// the rest stay usable.
    pub fn open_documents(paths: &[PathBuf], options: &LoadOptions) -> Self {
        let mut workspace = Workspace::new();
        let mut failed = Vec::new();

        for path in paths {
            match load_document(path, options) {
                Ok(document) => workspace.open(document),
                Err(e) => {
                    error!("Failed to open {}: {e}", path.display());
                    failed.push(path.display().to_string());
                }
            }
        }

        // Land on the first document by name rather than the last one opened
        let first = workspace.names().next().map(str::to_string);
        if let Some(first) = first {
            workspace.activate(&first);
        }

        info!("Opened {} of {} documents", workspace.len(), paths.len());

        let mut app = Self::new(workspace);
        if !failed.is_empty() {
            app.notice = Some(format!("Could not open: {}", failed.join(", ")));
        }
        app
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    pub fn set_viewport(&mut self, width: u16, height: u16) {
        let viewport = Viewport::new(usize::from(width), usize::from(height));
        self.workspace.apply(Command::SetViewport(viewport));
    }

    /// What the active document shows right now
    pub fn frame(&self) -> Frame {
        let mut frame = match self.workspace.active() {
            Some(entry) => Frame::build(entry),
            None => Frame::empty("no documents open"),
        };

        if let Some(prompt) = &self.prompt {
            frame.status = format!("{}{}", prompt.kind.symbol(), prompt.input);
        } else if let Some(notice) = &self.notice {
            frame.status = notice.clone();
        }

        frame
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<AppAction> {
        self.notice = None;

        if self.prompt.is_some() {
            self.handle_prompt_key(key);
            return None;
        }

        match key.code {
            KeyCode::Char('q' | 'Q') => return Some(AppAction::Quit),
            KeyCode::Tab => self.workspace.next_document(),
            KeyCode::BackTab => self.workspace.previous_document(),
            KeyCode::Char('/') => self.start_prompt(PromptKind::Search(SearchDirection::Forward)),
            KeyCode::Char('?') => self.start_prompt(PromptKind::Search(SearchDirection::Backward)),
            KeyCode::Char(':') => self.start_prompt(PromptKind::PageNumber),
            KeyCode::Char('n') => self.advance_search(true),
            KeyCode::Char('N') => self.advance_search(false),
            _ => {
                let outline = self
                    .workspace
                    .active()
                    .is_some_and(|entry| entry.view.viewing_outline);
                let command = if outline {
                    outline_command(key)
                } else {
                    page_command(key)
                };
                if let Some(command) = command {
                    let effects = self.workspace.apply(command);
                    debug!("Effects: {effects:?}");
                }
            }
        }

        None
    }

    fn start_prompt(&mut self, kind: PromptKind) {
        self.prompt = Some(Prompt {
            kind,
            input: String::new(),
        });
    }

    fn advance_search(&mut self, forward: bool) {
        let Some(entry) = self.workspace.active_mut() else {
            return;
        };
        let command = if forward {
            entry.view.advance_command()
        } else {
            entry.view.retreat_command()
        };
        entry.apply(command);
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };

        match key.code {
            KeyCode::Esc => self.prompt = None,
            KeyCode::Backspace => {
                prompt.input.pop();
            }
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => {}
            KeyCode::Char(c) => {
                if prompt.input.chars().count() < prompt.kind.max_len() {
                    prompt.input.push(c);
                }
            }
            KeyCode::Enter => {
                if let Some(prompt) = self.prompt.take() {
                    self.commit_prompt(prompt);
                }
            }
            _ => {}
        }
    }

    fn commit_prompt(&mut self, prompt: Prompt) {
        match prompt.kind {
            PromptKind::Search(direction) => {
                self.workspace.apply(Command::Search {
                    query: prompt.input,
                    direction,
                });
                self.workspace.apply(Command::ShowSearchResult);
            }
            PromptKind::PageNumber => {
                self.workspace.apply(Command::GoToPageNumber(prompt.input));
            }
        }
    }

    pub fn draw(&mut self, f: &mut ratatui::Frame) {
        let [content, status] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(f.area());

        self.set_viewport(content.width, content.height);
        let frame = self.frame();

        let lines: Vec<Line> = frame.rows.iter().map(|row| styled_line(row)).collect();
        f.render_widget(Paragraph::new(lines), content);

        let status_style = Style::default().add_modifier(Modifier::REVERSED);
        f.render_widget(
            Paragraph::new(Line::from(frame.status)).style(status_style),
            status,
        );
    }
}

fn page_command(key: KeyEvent) -> Option<Command> {
    let command = match key.code {
        KeyCode::Char('g') | KeyCode::Home => Command::GoToStartOfDocument,
        KeyCode::Char('G') | KeyCode::End => Command::GoToEndOfDocument,
        KeyCode::Char('u' | 'U') => Command::GoToStartOfPage,
        KeyCode::Char('d' | 'D') => Command::GoToEndOfPage,
        KeyCode::Char('b' | 'B') | KeyCode::PageUp => Command::PreviousPage,
        KeyCode::Char(' ' | 'f' | 'F') | KeyCode::PageDown => Command::NextPage,
        KeyCode::Char('j' | 'J' | 'e' | 'E') | KeyCode::Down | KeyCode::Enter => Command::ScrollDown,
        KeyCode::Char('k' | 'K' | 'y' | 'Y') | KeyCode::Up => Command::ScrollUp,
        KeyCode::Char('h' | 'H') | KeyCode::Left => Command::PanLeft,
        KeyCode::Char('l' | 'L') | KeyCode::Right => Command::PanRight,
        KeyCode::Char('o') => Command::ToggleOutline,
        _ => return None,
    };
    Some(command)
}

fn outline_command(key: KeyEvent) -> Option<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let command = match key.code {
        KeyCode::Char('d') if ctrl => Command::OutlineHalfPageDown,
        KeyCode::Char('u') if ctrl => Command::OutlineHalfPageUp,
        KeyCode::Char('j' | 'J' | 'e' | 'E') | KeyCode::Down => Command::OutlineNext,
        KeyCode::Char('k' | 'K' | 'y' | 'Y') | KeyCode::Up => Command::OutlinePrevious,
        KeyCode::Char(' ' | 'f' | 'F') | KeyCode::PageDown => Command::OutlinePageDown,
        KeyCode::Char('b' | 'B') | KeyCode::PageUp => Command::OutlinePageUp,
        KeyCode::Char('g') | KeyCode::Home => Command::OutlineFirst,
        KeyCode::Char('G') | KeyCode::End => Command::OutlineLast,
        KeyCode::Char('h' | 'H') | KeyCode::Left => Command::OutlinePanLeft,
        KeyCode::Char('l' | 'L') | KeyCode::Right => Command::OutlinePanRight,
        KeyCode::Enter => Command::ActivateOutline,
        KeyCode::Char('o') | KeyCode::Esc => Command::ToggleOutline,
        _ => return None,
    };
    Some(command)
}

fn cell_style(class: CellClass) -> Style {
    match class {
        CellClass::Plain => Style::default(),
        CellClass::Highlighted => Style::default().bg(Color::Blue),
        CellClass::Active => Style::default().fg(Color::Black).bg(Color::Yellow),
    }
}

/// Group runs of equally classified cells into spans
fn styled_line(row: &[FrameCell]) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut class = CellClass::Plain;

    for cell in row {
        if cell.class != class && !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), cell_style(class)));
        }
        class = cell.class;
        run.push(cell.ch);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, cell_style(class)));
    }

    Line::from(spans)
}

pub fn run_app_with_event_source<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_source: &mut dyn EventSource,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let tick_rate = Duration::from_millis(250);
    let mut needs_redraw = true;

    loop {
        if needs_redraw {
            terminal.draw(|f| app.draw(f))?;
            needs_redraw = false;
        }

        if !event_source.poll(tick_rate)? {
            continue;
        }

        match event_source.read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if app.handle_key_event(key) == Some(AppAction::Quit) {
                    return Ok(());
                }
                needs_redraw = true;
            }
            Event::Resize(_cols, _rows) => {
                needs_redraw = true;
            }
            _ => {}
        }
    }
}
