// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTML tidy pass: inject the fetched URL as a `<meta name="location">` so
//! downstream xpath/regex capability calls can recover it from the
//! document alone, and normalize the bare `disabled` boolean attribute to
//! `disabled="true"` so presence checks don't have to special-case
//! HTML5's shorthand. The only hard requirement is determinism: identical
//! input must always tidy to identical output.

use regex::Regex;

pub fn tidy(html: &str, location: &str) -> String {
    let with_meta = inject_location_meta(html, location);
    rewrite_bare_disabled(&with_meta)
}

fn inject_location_meta(html: &str, location: &str) -> String {
    let meta = format!(r#"<meta name="location" content="{}">"#, escape_attr(location));
    let head_open = Regex::new(r"(?i)<head[^>]*>").expect("static pattern");
    if let Some(m) = head_open.find(html) {
        let mut out = String::with_capacity(html.len() + meta.len());
        out.push_str(&html[..m.end()]);
        out.push_str(&meta);
        out.push_str(&html[m.end()..]);
        out
    } else {
        format!("{meta}{html}")
    }
}

fn rewrite_bare_disabled(html: &str) -> String {
    let bare = Regex::new(r#"(?i)(<[a-z][a-z0-9]*\b[^>]*?)\bdisabled\b(?!\s*=)([^>]*>)"#)
        .expect("static pattern");
    bare.replace_all(html, r#"$1disabled="true"$2"#).into_owned()
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
#[path = "tidy_tests.rs"]
mod tests;
