// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A pragmatic XPath subset sufficient for `get_by_xpath`/
//! `get_all_by_xpath` and `submit_form`'s form lookup.
//!
//! No xpath engine exists in the dependency pack this workspace draws
//! from; rather than fabricate one, this evaluates a restricted grammar —
//! a `/`-separated chain of descendant tag steps, each with an optional
//! `[@attr='value']` or `[N]` predicate, ending optionally in `/@attr` or
//! `/text()` — on top of `scraper`'s CSS selector engine. Composition with
//! the HTML tidy pass is deterministic given identical input, which is
//! all that's required of this pair.

use scraper::{ElementRef, Html, Selector};

use crate::error::CapabilityError;

#[derive(Debug, Clone)]
enum Predicate {
    Attr(String, String),
    Index(usize),
}

#[derive(Debug, Clone)]
struct TagStep {
    tag: String,
    predicate: Option<Predicate>,
}

#[derive(Debug, Clone)]
enum Extract {
    Attr(String),
    Text,
    Default,
}

#[derive(Debug, Clone)]
struct ParsedXPath {
    steps: Vec<TagStep>,
    extract: Extract,
}

fn parse(xpath: &str) -> Result<ParsedXPath, CapabilityError> {
    let trimmed = xpath.trim();
    if trimmed.is_empty() {
        return Err(CapabilityError::InvalidXpath(xpath.to_string()));
    }
    let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return Err(CapabilityError::InvalidXpath(xpath.to_string()));
    }

    let mut steps = Vec::new();
    let mut extract = Extract::Default;
    let last = segments.len() - 1;

    for (i, segment) in segments.iter().enumerate() {
        if i == last && *segment == "text()" {
            extract = Extract::Text;
            continue;
        }
        if i == last {
            if let Some(attr) = segment.strip_prefix('@') {
                extract = Extract::Attr(attr.to_string());
                continue;
            }
        }
        steps.push(parse_tag_step(segment, xpath)?);
    }

    if steps.is_empty() {
        return Err(CapabilityError::InvalidXpath(xpath.to_string()));
    }

    Ok(ParsedXPath { steps, extract })
}

fn parse_tag_step(segment: &str, original: &str) -> Result<TagStep, CapabilityError> {
    let invalid = || CapabilityError::InvalidXpath(original.to_string());

    let (tag_part, predicate_part) = match segment.split_once('[') {
        Some((tag, rest)) => {
            let inner = rest.strip_suffix(']').ok_or_else(invalid)?;
            (tag, Some(inner))
        }
        None => (segment, None),
    };

    if tag_part.is_empty() || !tag_part.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(invalid());
    }

    let predicate = match predicate_part {
        None => None,
        Some(inner) => Some(parse_predicate(inner).ok_or_else(invalid)?),
    };

    Ok(TagStep {
        tag: tag_part.to_string(),
        predicate,
    })
}

fn parse_predicate(inner: &str) -> Option<Predicate> {
    if let Some(rest) = inner.strip_prefix('@') {
        let (name, value) = rest.split_once('=')?;
        let value = value.trim().trim_matches(|c| c == '\'' || c == '"');
        return Some(Predicate::Attr(name.trim().to_string(), value.to_string()));
    }
    inner.trim().parse::<usize>().ok().map(Predicate::Index)
}

fn step_matches<'a>(root: ElementRef<'a>, step: &TagStep) -> Vec<ElementRef<'a>> {
    let Ok(selector) = Selector::parse(&step.tag) else {
        return Vec::new();
    };
    let mut matches: Vec<ElementRef<'a>> = root.select(&selector).collect();
    match &step.predicate {
        None => {}
        Some(Predicate::Attr(name, value)) => {
            matches.retain(|el| el.value().attr(name) == Some(value.as_str()));
        }
        Some(Predicate::Index(n)) => {
            matches = matches.into_iter().nth(n.saturating_sub(1)).into_iter().collect();
        }
    }
    matches
}

fn resolve_steps<'a>(document: &'a Html, steps: &[TagStep]) -> Vec<ElementRef<'a>> {
    let mut current = vec![document.root_element()];
    for step in steps {
        let mut next = Vec::new();
        for el in &current {
            next.extend(step_matches(*el, step));
        }
        current = next;
    }
    current
}

/// Resolve the tag-path portion of `xpath` (ignoring any trailing
/// `/@attr`/`/text()`) to the matched elements themselves — used by
/// `submit_form` to locate a form or submit node directly.
pub(crate) fn select_elements<'a>(
    document: &'a Html,
    xpath: &str,
) -> Result<Vec<ElementRef<'a>>, CapabilityError> {
    let parsed = parse(xpath)?;
    Ok(resolve_steps(document, &parsed.steps))
}

/// Evaluate `xpath` against `html`, returning every matched value in
/// document order.
pub fn get_all_by_xpath(html: &str, xpath: &str) -> Result<Vec<String>, CapabilityError> {
    let parsed = parse(xpath)?;
    let document = Html::parse_document(html);
    let current = resolve_steps(&document, &parsed.steps);

    let values = current
        .into_iter()
        .map(|el| match &parsed.extract {
            Extract::Attr(name) => el.value().attr(name).unwrap_or("").to_string(),
            Extract::Text | Extract::Default => el.text().collect::<String>().trim().to_string(),
        })
        .collect();

    Ok(values)
}

/// Evaluate `xpath`, returning the first match or `""`.
pub fn get_by_xpath(html: &str, xpath: &str) -> Result<String, CapabilityError> {
    Ok(get_all_by_xpath(html, xpath)?.into_iter().next().unwrap_or_default())
}

#[cfg(test)]
#[path = "xpath_tests.rs"]
mod tests;
