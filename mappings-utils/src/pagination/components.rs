//! Pagination UI component builders (first/prev/next/last and more/less).

use twilight_model::channel::message::component::{ActionRow, Button, ButtonStyle, Component};

use super::page::PageGroup;
use super::session::{NavAction, SessionView};
use super::token::build_custom_id;

/// Build the navigation row for a session's current view.
///
/// Returns no components when there is nothing to navigate to.
pub fn build_nav_components(session_id: u64, view: &SessionView<'_>) -> Vec<Component> {
    if view.total <= 1 && view.toggle_target.is_none() {
        return vec![];
    }

    let at_start = view.index == 0;
    let at_end = view.index + 1 >= view.total;

    let mut buttons = vec![
        nav_button(session_id, NavAction::First, "⏮", at_start),
        nav_button(session_id, NavAction::Previous, "◀ Prev", at_start),
        nav_button(session_id, NavAction::Next, "Next ▶", at_end),
        nav_button(session_id, NavAction::Last, "⏭", at_end),
    ];

    if let Some(target) = view.toggle_target {
        let label = match target {
            PageGroup::Less => "🔍 More",
            PageGroup::More => "🔍 Less",
        };
        let mut toggle = nav_button(session_id, NavAction::Toggle, label, false);
        if let Component::Button(button) = &mut toggle {
            button.style = ButtonStyle::Primary;
        }
        buttons.push(toggle);
    }

    vec![Component::ActionRow(ActionRow {
        id: None,
        components: buttons,
    })]
}

fn nav_button(session_id: u64, action: NavAction, label: &str, disabled: bool) -> Component {
    Component::Button(Button {
        id: None,
        custom_id: Some(build_custom_id(session_id, action)),
        disabled,
        emoji: None,
        label: Some(label.to_owned()),
        style: ButtonStyle::Secondary,
        url: None,
        sku_id: None,
    })
}

#[cfg(test)]
mod tests {
    use mappings_data::ResultEntry;

    use super::super::page::{Page, PageSet};
    use super::*;

    fn view<'a>(page: &'a Page, index: usize, total: usize, toggle: Option<PageGroup>) -> SessionView<'a> {
        SessionView {
            page,
            group: PageGroup::More,
            index,
            total,
            toggle_target: toggle,
        }
    }

    fn buttons(components: &[Component]) -> Vec<&Button> {
        let Some(Component::ActionRow(row)) = components.first() else {
            return vec![];
        };
        row.components
            .iter()
            .filter_map(|component| match component {
                Component::Button(button) => Some(button),
                _ => None,
            })
            .collect()
    }

    fn page() -> Page {
        let pages = PageSet::from_results("t", None, &[ResultEntry::new("a", "a")]).unwrap();
        pages.page(PageGroup::More, 0).unwrap().clone()
    }

    #[test]
    fn single_page_has_no_controls() {
        let page = page();
        assert!(build_nav_components(1, &view(&page, 0, 1, None)).is_empty());
    }

    #[test]
    fn ends_disable_their_buttons() {
        let page = page();
        let components = build_nav_components(1, &view(&page, 0, 3, None));
        let disabled: Vec<bool> = buttons(&components).iter().map(|b| b.disabled).collect();
        assert_eq!(disabled, vec![true, true, false, false]);

        let components = build_nav_components(1, &view(&page, 2, 3, None));
        let disabled: Vec<bool> = buttons(&components).iter().map(|b| b.disabled).collect();
        assert_eq!(disabled, vec![false, false, true, true]);
    }

    #[test]
    fn toggle_button_only_with_second_group() {
        let page = page();
        let components = build_nav_components(9, &view(&page, 0, 1, Some(PageGroup::Less)));
        let all = buttons(&components);
        assert_eq!(all.len(), 5);
        assert_eq!(all[4].custom_id.as_deref(), Some("pg:9:toggle"));
        assert_eq!(all[4].label.as_deref(), Some("🔍 More"));
    }
}
