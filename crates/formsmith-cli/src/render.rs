//! Plain-text rendering of the pages.

use std::io::{self, Write};

use formsmith_core::listing::{Ranked, TemplateSummary};
use formsmith_core::template::TemplateRecord;
use formsmith_pages::{
    NO_FORMS_MESSAGE, NO_QUESTIONS_MESSAGE, NO_TEMPLATES_MESSAGE, OwnerCollection, Route,
    SearchState, TemplateBrowser,
};

/// Cards for a list of templates.
pub fn write_listing<W: Write>(out: &mut W, heading: &str, items: &[TemplateSummary]) -> io::Result<()> {
    writeln!(out, "{heading}")?;
    for item in items {
        writeln!(out, "  {}", item.title)?;
        if !item.description.is_empty() {
            writeln!(out, "    {}", item.description)?;
        }
        writeln!(out, "    Author: {}", item.author.name)?;
        writeln!(out, "    View: {}", Route::Template(item.id.clone()))?;
    }
    Ok(())
}

/// The ranked popular table.
pub fn write_popular<W: Write>(out: &mut W, items: &[Ranked<TemplateSummary>]) -> io::Result<()> {
    writeln!(out, "Top {} Most Popular Templates", items.len())?;
    writeln!(out, "#\tTitle\tDescription\tAuthor\tNumber of Forms")?;
    for Ranked { rank, item } in items {
        writeln!(
            out,
            "{rank}\t{}\t{}\t{}\t{}",
            item.title,
            item.description,
            item.author.name,
            item.form_count()
        )?;
    }
    Ok(())
}

/// Search results, or the status message when there are none to show.
pub fn write_search<W: Write>(out: &mut W, state: &SearchState) -> io::Result<()> {
    if let Some(message) = state.message() {
        writeln!(out, "{message}")?;
    }
    if !state.results().is_empty() {
        write_listing(out, "Search Results", state.results())?;
    }
    Ok(())
}

/// Latest templates followed by the popular table.
pub fn write_browser<W: Write>(out: &mut W, browser: &TemplateBrowser) -> io::Result<()> {
    write_listing(out, "Latest Templates", browser.latest())?;
    writeln!(out)?;
    write_popular(out, browser.popular())
}

/// A template with its active questions.
pub fn write_template<W: Write>(out: &mut W, record: &TemplateRecord) -> io::Result<()> {
    writeln!(out, "{}", record.title)?;
    if !record.description.is_empty() {
        writeln!(out, "{}", record.description)?;
    }
    if let Some(created_at) = record.created_at {
        writeln!(out, "Created: {created_at}")?;
    }
    writeln!(out)?;

    let blocks = record.question_blocks();
    if blocks.is_empty() {
        return writeln!(out, "{NO_QUESTIONS_MESSAGE}");
    }

    writeln!(out, "Custom Questions")?;
    for block in blocks {
        writeln!(out, "  {}", block.label)?;
        writeln!(out, "    {}", block.text)?;
    }
    Ok(())
}

/// The user's templates and forms, with their navigation targets.
pub fn write_owner<W: Write>(out: &mut W, page: &OwnerCollection) -> io::Result<()> {
    writeln!(out, "My Created Templates")?;
    if page.templates().is_empty() {
        writeln!(out, "  {NO_TEMPLATES_MESSAGE}")?;
    }
    for template in page.templates() {
        writeln!(out, "  {}", template.title)?;
        if !template.description.is_empty() {
            writeln!(out, "    {}", template.description)?;
        }
        writeln!(
            out,
            "    View: {}  Edit: {}  Delete: {}",
            Route::Template(template.id.clone()),
            Route::EditTemplate(template.id.clone()),
            Route::DeleteTemplate(template.id.clone()),
        )?;
    }

    writeln!(out)?;
    writeln!(out, "My Forms")?;
    if page.forms().is_empty() {
        writeln!(out, "  {NO_FORMS_MESSAGE}")?;
    }
    for form in page.forms() {
        let (title, description) = form
            .template
            .as_ref()
            .map(|t| (t.title.as_str(), t.description.as_str()))
            .unwrap_or_default();
        writeln!(out, "  Form for {title}")?;
        if !description.is_empty() {
            writeln!(out, "    {description}")?;
        }
        writeln!(
            out,
            "    View: {}  Edit: {}  Delete: {}",
            Route::Form(form.id.clone()),
            Route::EditForm(form.id.clone()),
            Route::DeleteForm(form.id.clone()),
        )?;
    }
    Ok(())
}
