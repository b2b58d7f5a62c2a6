use colored::Colorize;

use sab_contents_backend::tree_builder::LinkIssue;
use sab_contents_backend::types::{ContentItem, ContentsData, LangContainer};

fn default_text(c: &LangContainer) -> &str {
    c.default_value().or_else(|| c.iter().next().map(|(_, v)| v)).unwrap_or("")
}

fn render_item(item: &ContentItem, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let kind = if item.kind.is_container() {
        item.kind.as_str().cyan().bold()
    } else if item.kind.is_known() {
        item.kind.as_str().green()
    } else {
        item.kind.as_str().yellow()
    };

    let mut line = format!("{}[{}] {} {}", indent, item.id, kind, default_text(&item.title));

    if let (Some(t), Some(target)) = (&item.link.link_type, &item.link.link_target) {
        line.push_str(&format!(" -> {}:{}", t, target).dimmed().to_string());
    }
    if !item.audio.is_empty() {
        line.push_str(&format!(" audio({})", item.audio.langs().collect::<Vec<_>>().join(",")));
    }

    out.push_str(&line);
    out.push('\n');

    for child in &item.children {
        render_item(child, depth + 1, out);
    }
}

pub fn render_tree(data: &ContentsData) -> String {
    let mut out = String::new();

    if !data.title.is_empty() {
        out.push_str(&format!("{}\n", default_text(&data.title).bold()));
    }
    for item in &data.items {
        render_item(item, 0, &mut out);
    }
    for screen in &data.screens {
        let ids: Vec<String> = screen.items.iter().map(|i| i.to_string()).collect();
        out.push_str(&format!("screen {} {} [{}]\n", screen.id, default_text(&screen.title), ids.join(", ")));
    }

    out
}

pub fn render_issue(issue: &LinkIssue) -> String {
    format!("{} item {}: {}", "warning".yellow().bold(), issue.item_id, issue.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sab_contents_backend::types::{ItemKind, LinkMeta, LinkType};

    fn item(id: i64, kind: ItemKind, title: &str) -> ContentItem {
        let mut t = LangContainer::new();
        t.insert("default", title);
        ContentItem {
            id,
            kind,
            title: t,
            subtitle: LangContainer::new(),
            features: Default::default(),
            image: None,
            audio: LangContainer::new(),
            link: LinkMeta::default(),
            layout_mode: None,
            layout_collection: None,
            children: Vec::new(),
        }
    }

    #[test]
    fn test_render_tree_shows_audio_languages_and_nesting() {
        colored::control::set_override(false);

        let mut single = item(2, ItemKind::Single, "Welcome");
        single.audio.insert("default", "static/contents/welcome.mp3");
        single.audio.insert("tpi", "static/contents/welcome-tpi.mp3");
        single.link = LinkMeta {
            link_type: Some(LinkType::Screen),
            link_target: Some("2".to_string()),
            link_location: None,
        };

        let mut grid = item(3, ItemKind::Grid, "Gospels");
        grid.children.push(item(1, ItemKind::Single, "Matthew"));

        let data = ContentsData {
            items: vec![single, grid],
            ..Default::default()
        };

        let out = render_tree(&data);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "[2] single Welcome -> screen:2 audio(default,tpi)");
        assert_eq!(lines[1], "[3] grid Gospels");
        assert_eq!(lines[2], "  [1] single Matthew");
    }
}
