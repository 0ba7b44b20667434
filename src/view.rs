//! HTML pages.
//!
//! Entry titles and every other user-supplied string are escaped. Entry text
//! is written verbatim so the owner's inline markup renders.

use crate::entry::Entry;

pub const NO_ENTRIES: &str = "No entries yet. Add some!";
pub const NO_MATCHES: &str = "No entries match your search.";

/// What every page needs besides its own body.
pub struct Chrome<'a> {
    pub logged_in: bool,
    pub flashes: &'a [String],
}

/// Escapes `&`, `<`, `>`, `"` and `'`.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn index(chrome: &Chrome<'_>, entries: &[Entry]) -> String {
    let mut body = String::new();
    if chrome.logged_in {
        body.push_str(concat!(
            r#"<form action="/add" method="post" class="add-entry">"#,
            r#"<dl><dt>Title:</dt><dd><input type="text" size="30" name="title"></dd>"#,
            r#"<dt>Text:</dt><dd><textarea name="text" rows="5" cols="40"></textarea></dd>"#,
            r#"<dd><input type="submit" value="Share"></dd></dl></form>"#,
        ));
    }
    body.push_str(&entry_list(entries, chrome.logged_in, NO_ENTRIES));
    layout(chrome, &body)
}

pub fn login(chrome: &Chrome<'_>, error: Option<&str>) -> String {
    let mut body = String::from("<h2>Login</h2>");
    if let Some(error) = error {
        body.push_str(&format!(r#"<p class="error"><strong>Error:</strong> {}</p>"#, escape(error)));
    }
    body.push_str(concat!(
        r#"<form action="/login" method="post">"#,
        r#"<dl><dt>Username:</dt><dd><input type="text" name="username"></dd>"#,
        r#"<dt>Password:</dt><dd><input type="password" name="password"></dd>"#,
        r#"<dd><input type="submit" value="Login"></dd></dl></form>"#,
    ));
    layout(chrome, &body)
}

/// Search form plus results. An empty `query` lists every entry.
pub fn search(chrome: &Chrome<'_>, query: &str, entries: &[Entry]) -> String {
    let mut body = format!(
        concat!(
            r#"<form action="/search/" method="get" class="search">"#,
            r#"<input type="text" name="query" value="{}" placeholder="Type a query">"#,
            r#"<input type="submit" value="Search"></form>"#,
        ),
        escape(query),
    );
    let empty = if query.is_empty() { NO_ENTRIES } else { NO_MATCHES };
    body.push_str(&entry_list(entries, chrome.logged_in, empty));
    layout(chrome, &body)
}

fn entry_list(entries: &[Entry], deletable: bool, empty: &str) -> String {
    let mut out = String::from(r#"<ul class="entries">"#);
    if entries.is_empty() {
        out.push_str(&format!("<li><em>{empty}</em></li>"));
    }
    for entry in entries {
        out.push_str(&format!(
            r#"<li class="entry" id="entry-{}"><h2>{}</h2>{}"#,
            entry.id,
            escape(&entry.title),
            entry.text,
        ));
        if deletable {
            out.push_str(&format!(r#" <a class="delete" href="/delete/{}">delete</a>"#, entry.id));
        }
        out.push_str("</li>");
    }
    out.push_str("</ul>");
    out
}

fn layout(chrome: &Chrome<'_>, body: &str) -> String {
    let nav = if chrome.logged_in {
        r#"<a href="/logout">log out</a>"#
    } else {
        r#"<a href="/login">log in</a>"#
    };
    let flashes: String = chrome
        .flashes
        .iter()
        .map(|message| format!(r#"<div class="flash">{}</div>"#, escape(message)))
        .collect();
    format!(
        concat!(
            "<!doctype html>\n",
            r#"<html><head><meta charset="utf-8"><title>Microblog</title></head>"#,
            r#"<body><div class="page"><h1><a href="/">Microblog</a></h1>"#,
            r#"<div class="metanav">{} <a href="/search/">search</a></div>"#,
            "{}{}</div></body></html>\n",
        ),
        nav, flashes, body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, title: &str, text: &str) -> Entry {
        Entry { id, title: title.to_string(), text: text.to_string() }
    }

    const GUEST: Chrome<'static> = Chrome { logged_in: false, flashes: &[] };

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(escape(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }

    #[test]
    fn title_is_escaped_and_text_is_raw() {
        let page = index(&GUEST, &[entry(1, "<Hello>", "<strong>HTML</strong> allowed here")]);
        assert!(page.contains("&lt;Hello&gt;"));
        assert!(!page.contains("<Hello>"));
        assert!(page.contains("<strong>HTML</strong> allowed here"));
    }

    #[test]
    fn empty_index_invites_posting() {
        assert!(index(&GUEST, &[]).contains(NO_ENTRIES));
    }

    #[test]
    fn owner_sees_add_form_and_delete_links() {
        let chrome = Chrome { logged_in: true, flashes: &[] };
        let page = index(&chrome, &[entry(7, "t", "x")]);
        assert!(page.contains(r#"action="/add""#));
        assert!(page.contains(r#"href="/delete/7""#));
        assert!(page.contains("log out"));

        let guest = index(&GUEST, &[entry(7, "t", "x")]);
        assert!(!guest.contains(r#"action="/add""#));
        assert!(!guest.contains("/delete/7"));
    }

    #[test]
    fn flashes_are_rendered() {
        let flashes = vec!["You were logged in".to_string()];
        let chrome = Chrome { logged_in: true, flashes: &flashes };
        assert!(index(&chrome, &[]).contains(r#"<div class="flash">You were logged in</div>"#));
    }

    #[test]
    fn search_echoes_query_escaped() {
        let page = search(&GUEST, r#""><script>"#, &[]);
        assert!(page.contains("&quot;&gt;&lt;script&gt;"));
        assert!(page.contains(NO_MATCHES));
        assert!(search(&GUEST, "", &[]).contains(NO_ENTRIES));
    }

    #[test]
    fn login_error_is_shown() {
        assert!(login(&GUEST, Some("Invalid password")).contains("Invalid password"));
        assert!(!login(&GUEST, None).contains("Error:"));
    }
}
