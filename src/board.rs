use crate::format::Category;
use crate::issue::{Issue, IssueState};

pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Open,
    Closed,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [StatusFilter::All, StatusFilter::Open, StatusFilter::Closed];

    pub fn matches(self, state: IssueState) -> bool {
        match self {
            Self::All => true,
            Self::Open => state == IssueState::Open,
            Self::Closed => state == IssueState::Closed,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "すべて",
            Self::Open => "対応待ち",
            Self::Closed => "対応済み",
        }
    }

    pub fn cycle(self, forward: bool) -> Self {
        cycle_option(&Self::ALL, &self, forward)
    }
}

/// Category selection. A label matches when its name contains the text, so
/// `道路` selects `道路・歩道`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Label(String),
}

impl CategoryFilter {
    pub fn options() -> Vec<CategoryFilter> {
        let mut options = vec![CategoryFilter::All];
        options.extend(Category::ALL.iter().map(|category| CategoryFilter::from(*category)));
        options
    }

    pub fn matches(&self, issue: &Issue) -> bool {
        match self {
            Self::All => true,
            Self::Label(needle) => issue.has_label_containing(needle),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => "すべて",
            Self::Label(needle) => needle.as_str(),
        }
    }

    pub fn cycle(&self, forward: bool) -> Self {
        cycle_option(&Self::options(), self, forward)
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        CategoryFilter::Label(category.label().to_string())
    }
}

fn cycle_option<T: Clone + PartialEq>(options: &[T], current: &T, forward: bool) -> T {
    let index = options
        .iter()
        .position(|option| option == current)
        .unwrap_or(0);
    let next = if forward {
        (index + 1) % options.len()
    } else if index == 0 {
        options.len() - 1
    } else {
        index - 1
    };
    options[next].clone()
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub category: CategoryFilter,
    pub status: StatusFilter,
}

impl Selection {
    pub fn matches(&self, issue: &Issue) -> bool {
        self.status.matches(issue.state) && self.category.matches(issue)
    }
}

pub fn visible_issues<'a>(issues: &'a [Issue], selection: &Selection) -> Vec<&'a Issue> {
    issues
        .iter()
        .filter(|issue| selection.matches(issue))
        .collect()
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IssueCounts {
    pub total: usize,
    pub open: usize,
    pub closed: usize,
}

impl IssueCounts {
    pub fn from_issues(issues: &[Issue]) -> Self {
        let open = issues
            .iter()
            .filter(|issue| issue.state == IssueState::Open)
            .count();
        Self {
            total: issues.len(),
            open,
            closed: issues.len() - open,
        }
    }
}

/// Filter selection plus the 1-based page cursor.
///
/// Transitions return a new state. Changing either filter puts the cursor
/// back on page 1; moving between pages clamps to the pages that exist for
/// the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    selection: Selection,
    page: usize,
    page_size: usize,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl BoardState {
    pub fn new(page_size: usize) -> Self {
        Self {
            selection: Selection::default(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn with_selection(&self, selection: Selection) -> Self {
        Self {
            selection,
            page: 1,
            page_size: self.page_size,
        }
    }

    pub fn with_category(&self, category: CategoryFilter) -> Self {
        self.with_selection(Selection {
            category,
            status: self.selection.status,
        })
    }

    pub fn with_status(&self, status: StatusFilter) -> Self {
        self.with_selection(Selection {
            category: self.selection.category.clone(),
            status,
        })
    }

    pub fn go_to_page(&self, page: usize, issues: &[Issue]) -> Self {
        let total = total_pages(
            visible_issues(issues, &self.selection).len(),
            self.page_size,
        );
        Self {
            selection: self.selection.clone(),
            page: page.clamp(1, total.max(1)),
            page_size: self.page_size,
        }
    }

    pub fn view<'a>(&self, issues: &'a [Issue]) -> BoardView<'a> {
        let visible = visible_issues(issues, &self.selection);
        let total_pages = total_pages(visible.len(), self.page_size);
        let page = self.page.clamp(1, total_pages.max(1));
        let start = (page - 1) * self.page_size;
        let page_issues = visible
            .iter()
            .skip(start)
            .take(self.page_size)
            .copied()
            .collect();
        BoardView {
            visible_count: visible.len(),
            total_pages,
            page,
            issues: page_issues,
        }
    }
}

/// Projection of a [`BoardState`] over a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView<'a> {
    pub visible_count: usize,
    pub total_pages: usize,
    pub page: usize,
    pub issues: Vec<&'a Issue>,
}

impl BoardView<'_> {
    pub fn is_empty(&self) -> bool {
        self.visible_count == 0
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn pagination(&self) -> Pagination {
        if self.total_pages <= 1 {
            return Pagination::Hidden;
        }
        Pagination::Active {
            current: self.page,
            total: self.total_pages,
        }
    }
}

/// Pagination controls state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    Hidden,
    Active { current: usize, total: usize },
}

impl Pagination {
    pub fn buttons(self) -> Vec<PageButton> {
        let (current, total) = match self {
            Pagination::Hidden => return Vec::new(),
            Pagination::Active { current, total } => (current, total),
        };
        let mut buttons = Vec::with_capacity(total + 2);
        buttons.push(PageButton {
            kind: PageButtonKind::Previous,
            target: current.saturating_sub(1).max(1),
            disabled: current == 1,
            active: false,
        });
        buttons.extend((1..=total).map(|page| PageButton {
            kind: PageButtonKind::Number,
            target: page,
            disabled: false,
            active: page == current,
        }));
        buttons.push(PageButton {
            kind: PageButtonKind::Next,
            target: (current + 1).min(total),
            disabled: current == total,
            active: false,
        });
        buttons
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButtonKind {
    Previous,
    Number,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageButton {
    pub kind: PageButtonKind,
    pub target: usize,
    pub disabled: bool,
    pub active: bool,
}

impl PageButton {
    pub fn caption(&self) -> String {
        match self.kind {
            PageButtonKind::Previous => "前へ".to_string(),
            PageButtonKind::Number => self.target.to_string(),
            PageButtonKind::Next => "次へ".to_string(),
        }
    }
}
