//! HTML rendering of the board.
//!
//! A render fills a [`Surface`]: the named insertion points of the page,
//! each holding an HTML fragment that is replaced wholesale on every render.
//! [`write_site`] renders every reachable filter/page combination to its own
//! file so filter controls and page buttons can be plain links.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::board::{
    BoardState, BoardView, CategoryFilter, IssueCounts, PageButton, Selection, StatusFilter,
};
use crate::format::{
    Category, PREVIEW_LIMIT, escape_html, extract_preview, format_date, label_color, status_text,
};
use crate::issue::Issue;

pub const LOADING_MESSAGE: &str = "読み込み中...";
pub const EMPTY_MESSAGE: &str = "該当する困りごとはありません";
pub const FAILURE_MESSAGE: &str =
    "データの読み込みに失敗しました。しばらくしてからもう一度お試しください。";
pub const PARTIAL_MESSAGE: &str =
    "一部の困りごとを読み込めませんでした。表示されている件数は実際より少ない可能性があります。";

const INDEX_FILE: &str = "index.html";

static GENERATED_PAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9-]+-(?:all|open|closed)-p[0-9]+\.html$").expect("valid page pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Slot {
    TotalCount,
    OpenCount,
    ClosedCount,
    IssuesList,
    Pagination,
    Loading,
}

impl Slot {
    pub fn id(self) -> &'static str {
        match self {
            Self::TotalCount => "total-count",
            Self::OpenCount => "open-count",
            Self::ClosedCount => "closed-count",
            Self::IssuesList => "issues-list",
            Self::Pagination => "pagination",
            Self::Loading => "loading",
        }
    }
}

/// Named insertion points of the board page. A slot that is absent has been
/// removed from the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    slots: BTreeMap<Slot, String>,
}

impl Surface {
    pub fn loading() -> Self {
        let mut slots = BTreeMap::new();
        for slot in [
            Slot::TotalCount,
            Slot::OpenCount,
            Slot::ClosedCount,
            Slot::IssuesList,
            Slot::Pagination,
        ] {
            slots.insert(slot, String::new());
        }
        slots.insert(Slot::Loading, escape_html(LOADING_MESSAGE));
        Self { slots }
    }

    pub fn set(&mut self, slot: Slot, html: impl Into<String>) {
        self.slots.insert(slot, html.into());
    }

    pub fn remove(&mut self, slot: Slot) {
        self.slots.remove(&slot);
    }

    pub fn get(&self, slot: Slot) -> Option<&str> {
        self.slots.get(&slot).map(String::as_str)
    }
}

pub fn render_counts(surface: &mut Surface, counts: IssueCounts) {
    surface.set(Slot::TotalCount, counts.total.to_string());
    surface.set(Slot::OpenCount, counts.open.to_string());
    surface.set(Slot::ClosedCount, counts.closed.to_string());
}

/// Writes the current page of `state` into the list and pagination slots.
pub fn render_issues(surface: &mut Surface, issues: &[Issue], state: &BoardState) {
    let view = state.view(issues);
    if view.is_empty() {
        surface.set(
            Slot::IssuesList,
            format!(
                "<div class=\"no-issues\"><p>{}</p></div>",
                escape_html(EMPTY_MESSAGE)
            ),
        );
        surface.set(Slot::Pagination, String::new());
        return;
    }

    let cards = view
        .issues
        .iter()
        .map(|issue| render_card(issue))
        .collect::<String>();
    surface.set(Slot::IssuesList, cards);
    surface.set(
        Slot::Pagination,
        render_pagination(state.selection(), &view),
    );
}

pub fn render_board(issues: &[Issue], counts: IssueCounts, state: &BoardState) -> Surface {
    let mut surface = Surface::loading();
    render_counts(&mut surface, counts);
    surface.remove(Slot::Loading);
    render_issues(&mut surface, issues, state);
    surface
}

pub fn render_failure() -> Surface {
    let mut surface = Surface::loading();
    surface.set(
        Slot::Loading,
        format!(
            "<div class=\"error-message\">{}</div>",
            escape_html(FAILURE_MESSAGE)
        ),
    );
    surface
}

pub fn render_card(issue: &Issue) -> String {
    let labels = issue
        .labels
        .iter()
        .map(|name| {
            let color = label_color(name);
            format!(
                "<span class=\"issue-label\" style=\"background:{};color:{}\">{}</span>",
                color.background,
                color.foreground,
                escape_html(name)
            )
        })
        .collect::<String>();
    format!(
        r#"
      <article class="issue-card">
        <div class="issue-header">
          <span class="issue-title">{title}</span>
          <span class="issue-status {status_class}">{status}</span>
        </div>
        <div class="issue-labels">{labels}</div>
        <div class="issue-body">{preview}</div>
        <div class="issue-meta">
          <span>報告日: {date}</span>
          <span>#{number}</span>
        </div>
      </article>"#,
        title = escape_html(&issue.title),
        status_class = issue.state.as_str(),
        status = status_text(issue.state),
        labels = labels,
        preview = escape_html(&extract_preview(issue.body.as_deref(), PREVIEW_LIMIT)),
        date = format_date(&issue.created_at),
        number = issue.number,
    )
}

pub fn render_pagination(selection: &Selection, view: &BoardView<'_>) -> String {
    view.pagination()
        .buttons()
        .iter()
        .map(|button| render_page_button(selection, button))
        .collect()
}

fn render_page_button(selection: &Selection, button: &PageButton) -> String {
    let caption = escape_html(&button.caption());
    if button.disabled {
        return format!("<button disabled>{}</button>", caption);
    }
    let class = if button.active {
        "page-button active"
    } else {
        "page-button"
    };
    format!(
        "<a class=\"{}\" href=\"{}\">{}</a>",
        class,
        escape_html(&page_file_name(selection, button.target)),
        caption
    )
}

/// File a selection/page pair is written to. `index.html` is the unfiltered
/// first page.
pub fn page_file_name(selection: &Selection, page: usize) -> String {
    if *selection == Selection::default() && page <= 1 {
        return INDEX_FILE.to_string();
    }
    format!(
        "{}-{}-p{}.html",
        category_slug(&selection.category),
        selection.status.slug(),
        page.max(1)
    )
}

fn category_slug(category: &CategoryFilter) -> String {
    match category {
        CategoryFilter::All => "all".to_string(),
        CategoryFilter::Label(needle) => match Category::from_label(needle) {
            Some(category) => category.slug().to_string(),
            None => {
                let mut slug = String::from("label-");
                for byte in needle.bytes() {
                    let _ = write!(slug, "{:02x}", byte);
                }
                slug
            }
        },
    }
}

fn render_filters(selection: &Selection) -> String {
    let mut html = String::new();
    html.push_str("<select id=\"category-filter\" onchange=\"location.href=this.value\">");
    for option in CategoryFilter::options() {
        let target = Selection {
            category: option.clone(),
            status: selection.status,
        };
        push_option(&mut html, &target, option == selection.category, option.label());
    }
    html.push_str("</select>");

    html.push_str("<select id=\"status-filter\" onchange=\"location.href=this.value\">");
    for status in StatusFilter::ALL {
        let target = Selection {
            category: selection.category.clone(),
            status,
        };
        push_option(&mut html, &target, status == selection.status, status.label());
    }
    html.push_str("</select>");
    html
}

fn push_option(html: &mut String, target: &Selection, selected: bool, label: &str) {
    let _ = write!(
        html,
        "<option value=\"{}\"{}>{}</option>",
        escape_html(&page_file_name(target, 1)),
        if selected { " selected" } else { "" },
        escape_html(label)
    );
}

fn render_slot(surface: &Surface, slot: Slot, tag: &str) -> String {
    match surface.get(slot) {
        Some(html) => format!("<{tag} id=\"{}\">{}</{tag}>", slot.id(), html),
        None => String::new(),
    }
}

/// Full HTML document for one board state. The filter controls are left
/// out when `selection` is `None`.
pub fn render_document(
    surface: &Surface,
    selection: Option<&Selection>,
    notice: Option<&str>,
) -> String {
    let notice = notice
        .map(|notice| {
            format!(
                "<div class=\"partial-notice\">{}</div>",
                escape_html(notice)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>困りごと一覧</title>
    <link rel="stylesheet" href="style.css">
</head>
<body>
    <header>
        <h1>困りごと一覧</h1>
        <div class="stats">
            <div>全体 {total}</div>
            <div>対応待ち {open}</div>
            <div>対応済み {closed}</div>
        </div>
    </header>
    <main>
        {filters}
        {notice}
        {loading}
        {list}
        {pagination}
    </main>
</body>
</html>
"#,
        total = render_slot(surface, Slot::TotalCount, "span"),
        open = render_slot(surface, Slot::OpenCount, "span"),
        closed = render_slot(surface, Slot::ClosedCount, "span"),
        filters = selection
            .map(|selection| {
                format!(
                    "<div class=\"filters\">{}</div>",
                    render_filters(selection)
                )
            })
            .unwrap_or_default(),
        notice = notice,
        loading = render_slot(surface, Slot::Loading, "div"),
        list = render_slot(surface, Slot::IssuesList, "div"),
        pagination = render_slot(surface, Slot::Pagination, "nav"),
    )
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SiteStats {
    pub documents: usize,
}

/// Renders every category/status/page combination into `out_dir`.
pub fn write_site(
    out_dir: &Path,
    issues: &[Issue],
    page_size: usize,
    partial: bool,
) -> Result<SiteStats> {
    prepare_out_dir(out_dir)?;

    let counts = IssueCounts::from_issues(issues);
    let notice = partial.then_some(PARTIAL_MESSAGE);
    let base = BoardState::new(page_size);
    let mut stats = SiteStats::default();
    for category in CategoryFilter::options() {
        for status in StatusFilter::ALL {
            let selection = Selection {
                category: category.clone(),
                status,
            };
            let state = base.with_selection(selection.clone());
            let pages = state.view(issues).total_pages.max(1);
            for page in 1..=pages {
                let state = state.go_to_page(page, issues);
                let surface = render_board(issues, counts, &state);
                let document = render_document(&surface, Some(&selection), notice);
                write_document(out_dir, &page_file_name(&selection, state.page()), &document)?;
                stats.documents += 1;
            }
        }
    }
    tracing::info!(
        out_dir = %out_dir.display(),
        documents = stats.documents,
        "wrote board"
    );
    Ok(stats)
}

/// Replaces the board with a lone failure page.
pub fn write_failure_page(out_dir: &Path) -> Result<()> {
    prepare_out_dir(out_dir)?;
    let document = render_document(&render_failure(), None, None);
    write_document(out_dir, INDEX_FILE, &document)
}

/// Creates `out_dir` and removes board pages left by an earlier run. Other
/// files in the directory are kept.
fn prepare_out_dir(out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output dir at {}", out_dir.display()))?;
    let entries = fs::read_dir(out_dir)
        .with_context(|| format!("Failed to read output dir at {}", out_dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        let generated = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name == INDEX_FILE || GENERATED_PAGE.is_match(name));
        if generated && path.is_file() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove stale page at {}", path.display()))?;
            tracing::debug!(path = %path.display(), "removed stale page");
        }
    }
    Ok(())
}

fn write_document(out_dir: &Path, name: &str, document: &str) -> Result<()> {
    let path = out_dir.join(name);
    fs::write(&path, document)
        .with_context(|| format!("Failed to write page at {}", path.display()))
}
