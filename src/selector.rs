//! ROM picker: a small directory browser in the terminal. Up/down move (and
//! wrap around), Enter opens a directory or picks a file, Esc or q gives up.
use crossterm::event::{read, Event, KeyCode};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use log::warn;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tui::backend::CrosstermBackend;
use tui::style::{Color, Modifier, Style};
use tui::widgets::{Block, Borders, List, ListItem, ListState};
use tui::Terminal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
}

/// what a keypress did to the browser
#[derive(Debug, PartialEq, Eq)]
pub enum Selection {
    Browsing,
    Picked(PathBuf),
    Cancelled,
}

/// directory listing plus a cursor
pub struct Browser {
    dir: PathBuf,
    entries: Vec<Entry>,
    selected: usize,
}

impl Browser {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, io::Error> {
        let mut b = Browser {
            dir: fs::canonicalize(dir)?,
            entries: Vec::new(),
            selected: 0,
        };
        b.refresh()?;
        Ok(b)
    }

    /// re-read the current directory: ".." first unless at the root, then
    /// directories, then files, each alphabetical
    fn refresh(&mut self) -> Result<(), io::Error> {
        let mut entries = Vec::new();
        for dirent in fs::read_dir(&self.dir)? {
            let dirent = dirent?;
            entries.push(Entry {
                name: dirent.file_name().to_string_lossy().into_owned(),
                // follows symlinks, like stat()
                is_dir: dirent.path().is_dir(),
            });
        }
        entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));
        if self.dir.parent().is_some() {
            entries.insert(
                0,
                Entry {
                    name: "..".to_string(),
                    is_dir: true,
                },
            );
        }
        self.entries = entries;
        self.selected = 0;
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn up(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.selected = match self.selected {
            0 => self.entries.len() - 1,
            n => n - 1,
        };
    }

    pub fn down(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.entries.len();
    }

    /// open the selected directory, or pick the selected file
    pub fn enter(&mut self) -> Result<Selection, io::Error> {
        let entry = match self.entries.get(self.selected) {
            Some(e) => e.clone(),
            None => return Ok(Selection::Browsing),
        };
        if !entry.is_dir {
            return Ok(Selection::Picked(self.dir.join(entry.name)));
        }
        let previous = self.dir.clone();
        if entry.name == ".." {
            if let Some(parent) = self.dir.parent() {
                self.dir = parent.to_path_buf();
            }
        } else {
            self.dir.push(&entry.name);
        }
        if let Err(e) = self.refresh() {
            // unreadable directory: stay where we were
            warn!("can't open {}: {}", self.dir.display(), e);
            self.dir = previous;
            self.refresh()?;
        }
        Ok(Selection::Browsing)
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<Selection, io::Error> {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.up(),
            KeyCode::Down | KeyCode::Char('j') => self.down(),
            KeyCode::Enter => return self.enter(),
            KeyCode::Esc | KeyCode::Char('q') => return Ok(Selection::Cancelled),
            _ => {}
        }
        Ok(Selection::Browsing)
    }
}

/// run the browser full-screen until something is picked; None if cancelled
pub fn select_rom(start: impl AsRef<Path>) -> Result<Option<PathBuf>, io::Error> {
    let mut browser = Browser::new(start)?;
    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;
    let result = browse(&mut browser, Terminal::new(CrosstermBackend::new(stdout))?);
    execute!(io::stdout(), LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn browse(
    browser: &mut Browser,
    mut terminal: Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<Option<PathBuf>, io::Error> {
    let mut state = ListState::default();
    loop {
        state.select(Some(browser.selected()));
        let title = format!("Select a CHIP-8 ROM: {}", browser.dir().display());
        let items: Vec<ListItem> = browser
            .entries()
            .iter()
            .map(|e| {
                let marker = if e.is_dir { "[dir] " } else { "      " };
                ListItem::new(format!("{}{}", marker, e.name))
            })
            .collect();
        terminal.draw(|f| {
            let list = List::new(items)
                .block(Block::default().title(title).borders(Borders::ALL))
                .highlight_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("> ");
            f.render_stateful_widget(list, f.size(), &mut state);
        })?;

        if let Event::Key(evt) = read()? {
            match browser.handle_key(evt.code)? {
                Selection::Browsing => {}
                Selection::Picked(path) => return Ok(Some(path)),
                Selection::Cancelled => return Ok(None),
            }
        }
    }
}
