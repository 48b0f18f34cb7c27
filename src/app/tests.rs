use super::App;
use crate::board::{CategoryFilter, StatusFilter};
use crate::issue::{Issue, IssueState};
use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn issue(number: i64, state: IssueState, labels: &[&str]) -> Issue {
    Issue {
        number,
        title: format!("Issue {}", number),
        body: None,
        state,
        created_at: "2024-03-05T12:00:00Z"
            .parse::<DateTime<Utc>>()
            .expect("timestamp"),
        labels: labels.iter().map(|label| label.to_string()).collect(),
    }
}

fn app_with(open: usize, closed: usize) -> App {
    let mut issues = Vec::new();
    for number in 0..open {
        issues.push(issue(number as i64 + 1, IssueState::Open, &["道路・歩道"]));
    }
    for number in 0..closed {
        issues.push(issue((open + number) as i64 + 1, IssueState::Closed, &["安全"]));
    }
    App::new("acme/board", issues, 20)
}

fn press(app: &mut App, code: KeyCode) {
    app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
}

#[test]
fn status_key_cycles_filter_and_resets_page() {
    let mut app = app_with(45, 5);
    press(&mut app, KeyCode::Right);
    assert_eq!(app.view().page, 2);

    press(&mut app, KeyCode::Char('s'));

    assert_eq!(app.board().selection().status, StatusFilter::Open);
    assert_eq!(app.view().page, 1);
    assert_eq!(app.view().visible_count, 45);
}

#[test]
fn category_key_cycles_through_known_categories() {
    let mut app = app_with(3, 2);
    press(&mut app, KeyCode::Char('c'));
    assert_eq!(
        app.board().selection().category,
        CategoryFilter::Label("安全".to_string())
    );
    assert_eq!(app.view().visible_count, 2);

    press(&mut app, KeyCode::Char('C'));
    assert_eq!(app.board().selection().category, CategoryFilter::All);
}

#[test]
fn arrows_stay_within_existing_pages() {
    let mut app = app_with(45, 0);
    press(&mut app, KeyCode::Left);
    assert_eq!(app.view().page, 1);

    for _ in 0..5 {
        press(&mut app, KeyCode::Char('l'));
    }
    let view = app.view();
    assert_eq!(view.page, 3);
    assert_eq!(view.issues.len(), 5);
    assert!(!view.has_next());
}

#[test]
fn digit_jumps_only_to_rendered_pages() {
    let mut app = app_with(45, 0);
    press(&mut app, KeyCode::Char('3'));
    assert_eq!(app.view().page, 3);

    press(&mut app, KeyCode::Char('7'));
    assert_eq!(app.view().page, 3);
}

#[test]
fn page_navigation_returns_selection_to_top() {
    let mut app = app_with(45, 0);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::PageDown);
    assert_eq!(app.selected(), 2);
    assert_eq!(app.detail_scroll(), 5);

    press(&mut app, KeyCode::Char('2'));

    assert_eq!(app.selected(), 0);
    assert_eq!(app.detail_scroll(), 0);
    assert_eq!(app.selected_issue().map(|issue| issue.number), Some(21));
}

#[test]
fn selection_is_bounded_by_page_length() {
    let mut app = app_with(2, 0);
    press(&mut app, KeyCode::Up);
    assert_eq!(app.selected(), 0);
    for _ in 0..4 {
        press(&mut app, KeyCode::Char('j'));
    }
    assert_eq!(app.selected(), 1);
}

#[test]
fn empty_selection_has_no_selected_issue() {
    let mut app = app_with(2, 0);
    app.set_status_filter(StatusFilter::Closed);
    assert!(app.view().is_empty());
    assert!(app.selected_issue().is_none());
    press(&mut app, KeyCode::Down);
    assert_eq!(app.selected(), 0);
}

#[test]
fn quit_keys_set_should_quit() {
    let mut app = app_with(1, 0);
    press(&mut app, KeyCode::Char('q'));
    assert!(app.should_quit());

    let mut app = app_with(1, 0);
    app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit());
}

#[test]
fn counts_cover_whole_collection() {
    let mut app = app_with(4, 3);
    app.set_category(CategoryFilter::Label("安全".to_string()));
    let counts = app.counts();
    assert_eq!((counts.total, counts.open, counts.closed), (7, 4, 3));
}
