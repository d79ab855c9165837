//! Note templates.
//!
//! # Responsibility
//! - Ship the builtin template catalog.
//! - Validate user-defined templates.
//! - Render template markdown into editor markup.
//!
//! # Invariants
//! - Rendered content is HTML produced from the template markdown.
//! - Template tags go through the same normalization as note tags.

use crate::model::note::normalize_tags;
use pulldown_cmark::{html, Options, Parser};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Grouping used by template pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    Business,
    Personal,
    Custom,
}

/// A reusable note skeleton written in markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    /// Title given to the note the template is applied to.
    pub title: String,
    /// Markdown source.
    pub content: String,
    pub tags: Vec<String>,
    pub category: TemplateCategory,
}

/// Template output ready to merge into a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTemplate {
    pub title: String,
    /// HTML rendered from the template markdown.
    pub content: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    MissingField(&'static str),
}

impl Display for TemplateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "template {field} is required"),
        }
    }
}

impl Error for TemplateError {}

impl Template {
    /// Builds a user-defined template.
    ///
    /// `title` defaults to `name`; `tags_csv` is split on commas.
    ///
    /// # Errors
    /// - `MissingField` when `name` or `content` is blank.
    pub fn custom(
        name: &str,
        title: &str,
        content: &str,
        tags_csv: &str,
    ) -> Result<Self, TemplateError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TemplateError::MissingField("name"));
        }
        if content.trim().is_empty() {
            return Err(TemplateError::MissingField("content"));
        }
        let title = match title.trim() {
            "" => name,
            value => value,
        };
        let tags: Vec<String> = tags_csv.split(',').map(str::to_string).collect();

        Ok(Self {
            id: format!("custom-{}", uuid::Uuid::new_v4()),
            name: name.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            tags: normalize_tags(&tags),
            category: TemplateCategory::Custom,
        })
    }
}

/// Renders a template into title, HTML content and normalized tags.
pub fn render_template(template: &Template) -> RenderedTemplate {
    RenderedTemplate {
        title: template.title.clone(),
        content: markdown_to_html(&template.content),
        tags: normalize_tags(&template.tags),
    }
}

/// CommonMark plus tables, strikethrough and task lists.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}

/// Looks up a builtin template by id.
pub fn find_builtin(id: &str) -> Option<Template> {
    builtin_templates().into_iter().find(|template| template.id == id)
}

/// The builtin template catalog.
pub fn builtin_templates() -> Vec<Template> {
    vec![
        builtin(
            "meeting-notes",
            "Meeting Notes",
            "Meeting Notes - [Date]",
            MEETING_NOTES,
            &["meeting", "business", "notes"],
            TemplateCategory::Business,
        ),
        builtin(
            "blog-post",
            "Blog Post",
            "Blog Post Draft",
            BLOG_POST,
            &["blog", "writing", "content"],
            TemplateCategory::Personal,
        ),
        builtin(
            "task-list",
            "Task List",
            "Task List - [Project Name]",
            TASK_LIST,
            &["tasks", "productivity", "planning"],
            TemplateCategory::Personal,
        ),
        builtin(
            "project-plan",
            "Project Plan",
            "Project Plan - [Project Name]",
            PROJECT_PLAN,
            &["project", "planning", "business"],
            TemplateCategory::Business,
        ),
    ]
}

fn builtin(
    id: &str,
    name: &str,
    title: &str,
    content: &str,
    tags: &[&str],
    category: TemplateCategory,
) -> Template {
    Template {
        id: id.to_string(),
        name: name.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        category,
    }
}

const MEETING_NOTES: &str = "# Meeting Notes

**Date:** [Date]
**Attendees:** [List attendees]
**Duration:** [Duration]

## Agenda
- [ ] Item 1
- [ ] Item 2
- [ ] Item 3

## Discussion Points
### Topic 1
[Notes]

### Topic 2
[Notes]

## Action Items
- [ ] [Action] - Assigned to: [Person] - Due: [Date]
- [ ] [Action] - Assigned to: [Person] - Due: [Date]

## Next Steps
[Next steps and follow-up items]

## Next Meeting
**Date:** [Date]
**Time:** [Time]";

const BLOG_POST: &str = "# [Blog Post Title]

**Published:** [Date]
**Author:** [Your Name]
**Tags:** [tag1, tag2, tag3]

## Introduction
[Hook your readers with an engaging opening paragraph]

## Main Content

### Section 1
[Your main points and supporting details]

### Section 2
[Continue developing your ideas]

### Section 3
[Additional insights or examples]

## Conclusion
[Summarize key points and provide a call-to-action]

---

**Meta Description:** [SEO description for search engines]
**Keywords:** [SEO keywords]";

const TASK_LIST: &str = "# Task List - [Project Name]

**Created:** [Date]
**Priority:** [High/Medium/Low]
**Due Date:** [Date]

## High Priority
- [ ] [Task 1] - Due: [Date]
- [ ] [Task 2] - Due: [Date]

## Medium Priority
- [ ] [Task 3] - Due: [Date]
- [ ] [Task 4] - Due: [Date]

## Low Priority
- [ ] [Task 5] - Due: [Date]
- [ ] [Task 6] - Due: [Date]

## Completed
- [x] [Completed task 1]
- [x] [Completed task 2]

## Notes
[Additional notes or context]";

const PROJECT_PLAN: &str = "# Project Plan - [Project Name]

**Project Manager:** [Name]
**Start Date:** [Date]
**End Date:** [Date]
**Status:** [Planning/In Progress/Completed]

## Project Overview
[Brief description of the project]

## Objectives
- [Objective 1]
- [Objective 2]
- [Objective 3]

## Scope
### In Scope
- [Item 1]
- [Item 2]

### Out of Scope
- [Item 1]
- [Item 2]

## Timeline
| Phase | Start Date | End Date | Status |
|-------|------------|----------|--------|
| Phase 1 | [Date] | [Date] | [Status] |
| Phase 2 | [Date] | [Date] | [Status] |
| Phase 3 | [Date] | [Date] | [Status] |

## Resources
- **Team Members:** [List team members]
- **Budget:** [Budget amount]
- **Tools:** [Required tools/software]

## Risks
| Risk | Impact | Probability | Mitigation |
|------|--------|-------------|------------|
| [Risk 1] | [High/Medium/Low] | [High/Medium/Low] | [Mitigation strategy] |

## Success Criteria
- [Criteria 1]
- [Criteria 2]
- [Criteria 3]";
