use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::board::{BoardState, BoardView, CategoryFilter, IssueCounts, StatusFilter};
use crate::issue::Issue;

/// Interactive board state for the terminal front-end.
///
/// The issue collection is fixed at construction. Key presses replace the
/// [`BoardState`]; everything drawn is derived from it on each frame.
pub struct App {
    repo_label: String,
    issues: Vec<Issue>,
    counts: IssueCounts,
    board: BoardState,
    selected: usize,
    detail_scroll: u16,
    status: String,
    should_quit: bool,
}

impl App {
    pub fn new(repo_label: impl Into<String>, issues: Vec<Issue>, page_size: usize) -> Self {
        let counts = IssueCounts::from_issues(&issues);
        Self {
            repo_label: repo_label.into(),
            issues,
            counts,
            board: BoardState::new(page_size),
            selected: 0,
            detail_scroll: 0,
            status: String::new(),
            should_quit: false,
        }
    }

    pub fn repo_label(&self) -> &str {
        &self.repo_label
    }

    pub fn counts(&self) -> IssueCounts {
        self.counts
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn view(&self) -> BoardView<'_> {
        self.board.view(&self.issues)
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_issue(&self) -> Option<&Issue> {
        self.view().issues.get(self.selected).copied()
    }

    pub fn detail_scroll(&self) -> u16 {
        self.detail_scroll
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') => self.cycle_category(true),
            KeyCode::Char('C') => self.cycle_category(false),
            KeyCode::Char('s') => self.cycle_status(true),
            KeyCode::Char('S') => self.cycle_status(false),
            KeyCode::Left | KeyCode::Char('h') => self.previous_page(),
            KeyCode::Right | KeyCode::Char('l') => self.next_page(),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::PageDown | KeyCode::Char('J') => self.scroll_detail(true),
            KeyCode::PageUp | KeyCode::Char('K') => self.scroll_detail(false),
            KeyCode::Char(digit @ '1'..='9') => {
                let page = digit as usize - '0' as usize;
                if page <= self.view().total_pages {
                    self.go_to_page(page);
                }
            }
            _ => {}
        }
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.board = self.board.with_category(category);
        self.reset_to_top();
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.board = self.board.with_status(status);
        self.reset_to_top();
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.board = self.board.go_to_page(page, &self.issues);
        self.reset_to_top();
    }

    fn cycle_category(&mut self, forward: bool) {
        let next = self.board.selection().category.cycle(forward);
        self.set_category(next);
    }

    fn cycle_status(&mut self, forward: bool) {
        let next = self.board.selection().status.cycle(forward);
        self.set_status_filter(next);
    }

    fn previous_page(&mut self) {
        let (page, has_previous) = {
            let view = self.view();
            (view.page, view.has_previous())
        };
        if has_previous {
            self.go_to_page(page - 1);
        }
    }

    fn next_page(&mut self) {
        let (page, has_next) = {
            let view = self.view();
            (view.page, view.has_next())
        };
        if has_next {
            self.go_to_page(page + 1);
        }
    }

    fn move_selection(&mut self, forward: bool) {
        let len = self.view().issues.len();
        if len == 0 {
            return;
        }
        let next = if forward {
            (self.selected + 1).min(len - 1)
        } else {
            self.selected.saturating_sub(1)
        };
        if next != self.selected {
            self.selected = next;
            self.detail_scroll = 0;
        }
    }

    fn scroll_detail(&mut self, forward: bool) {
        self.detail_scroll = if forward {
            self.detail_scroll.saturating_add(5)
        } else {
            self.detail_scroll.saturating_sub(5)
        };
    }

    fn reset_to_top(&mut self) {
        self.selected = 0;
        self.detail_scroll = 0;
    }
}

#[cfg(test)]
mod tests;
