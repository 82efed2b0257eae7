// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `submit_form`: locate a form, overlay caller params on its defaults,
//! resolve the action URL.

use scraper::{ElementRef, Html, Selector};

use crate::error::CapabilityError;
use crate::xpath;

/// A form ready to be URL-encoded and POSTed.
#[derive(Debug, Clone)]
pub struct FormSubmission {
    pub action: String,
    pub fields: Vec<(String, String)>,
}

fn locate_form<'a>(document: &'a Html, page_xpath: &str) -> Result<ElementRef<'a>, CapabilityError> {
    let candidates = xpath::select_elements(document, page_xpath)?;
    let start = candidates.into_iter().next().ok_or(CapabilityError::NoFormOrSubmit)?;

    if start.value().name() == "form" {
        return Ok(start);
    }
    start
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "form")
        .ok_or(CapabilityError::SubmitNotInForm)
}

fn default_fields(form: ElementRef<'_>) -> Vec<(String, String)> {
    let field_selector = Selector::parse("input, select, button, textarea").expect("static selector");
    let option_selector = Selector::parse("option").expect("static selector");
    let mut fields = Vec::new();

    for el in form.select(&field_selector) {
        let value = el.value();
        if value.attr("disabled").is_some() {
            continue;
        }
        let Some(name) = value.attr("name") else { continue };

        let field_value = match value.name() {
            "select" => {
                let mut first = None;
                let mut selected = None;
                for option in el.select(&option_selector) {
                    let v = option.value().attr("value").unwrap_or_default().to_string();
                    if first.is_none() {
                        first = Some(v.clone());
                    }
                    if option.value().attr("selected").is_some() {
                        selected = Some(v);
                        break;
                    }
                }
                selected.or(first).unwrap_or_default()
            }
            "textarea" => el.text().collect::<String>(),
            _ => {
                let input_type = value.attr("type").unwrap_or("text");
                if matches!(input_type, "checkbox" | "radio") && value.attr("checked").is_none() {
                    continue;
                }
                value.attr("value").unwrap_or_default().to_string()
            }
        };

        fields.push((name.to_string(), field_value));
    }

    fields
}

/// Build a [`FormSubmission`] from `page_html`: locate the form at (or
/// above) `xpath`, overlay `params` on its defaults, and take the action
/// URL from `action_override` if given, else the form's own `action`
/// attribute (left unresolved — absolute vs. base-relative is the
/// capability bridge's call, since only it knows the session's base
/// server).
pub fn prepare_submission(
    page_html: &str,
    xpath: &str,
    params: &[(String, String)],
    action_override: Option<&str>,
) -> Result<FormSubmission, CapabilityError> {
    let document = Html::parse_document(page_html);
    let form = locate_form(&document, xpath)?;
    let mut fields = default_fields(form);

    for (key, value) in params {
        match fields.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.clone(),
            None => return Err(CapabilityError::ParamMismatch(key.clone())),
        }
    }

    let action = action_override
        .or_else(|| form.value().attr("action"))
        .unwrap_or_default()
        .to_string();

    Ok(FormSubmission { action, fields })
}

/// `true` if `target` names a full URL rather than a path relative to
/// the session's base server.
pub fn is_absolute(target: &str) -> bool {
    url::Url::parse(target).is_ok()
}

#[cfg(test)]
#[path = "form_tests.rs"]
mod tests;
