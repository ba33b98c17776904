//! Student-profile summarizer: renders a `StudentRecord` as the plain-text block
//! embedded in completion requests.
//!
//! Output is a pure function of the record. Sections always appear in the same
//! order (academic, extracurricular, leadership, service, projects, narrative),
//! and empty or whitespace-only fields are dropped entirely. A section with
//! nothing left has no header either.

use crate::models::student::StudentRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Everything the student entered. Used for essay drafting.
    Full,
    /// One line per item. Used for match scoring.
    Compact,
}

struct Section {
    title: &'static str,
    lines: Vec<String>,
}

impl Section {
    fn new(title: &'static str) -> Self {
        Self {
            title,
            lines: Vec::new(),
        }
    }

    fn push(&mut self, line: Option<String>) {
        if let Some(line) = line {
            self.lines.push(line);
        }
    }

    /// `  {label}: {value}` continuation line under an item, if the value is present.
    fn detail(&mut self, label: &str, value: &str) {
        if let Some(value) = text(value) {
            self.lines.push(format!("  {label}: {value}"));
        }
    }

    fn render(&self) -> Option<String> {
        if self.lines.is_empty() {
            return None;
        }
        Some(format!("**{}:**\n{}", self.title, self.lines.join("\n")))
    }
}

pub fn summarize(student: &StudentRecord, verbosity: Verbosity) -> String {
    let full = verbosity == Verbosity::Full;
    let mut blocks = Vec::new();

    if full {
        if let Some(name) = text(&student.full_name) {
            blocks.push(format!("**Name:** {name}"));
        }
    }

    let sections = [
        academic(student, full),
        extracurricular(student, full),
        leadership(student, full),
        service(student, full),
        projects(student, full),
        narrative(student, full),
    ];
    blocks.extend(sections.iter().filter_map(Section::render));

    blocks.join("\n\n")
}

fn academic(student: &StudentRecord, full: bool) -> Section {
    let mut section = Section::new("Academic Performance");

    section.push(opt(&student.grade_level).map(|g| format!("- Grade Level: {g}")));
    section.push(student.gpa.map(|gpa| format!("- GPA: {gpa:.2}")));

    if let Some(scores) = &student.test_scores {
        section.push(scores.sat.map(|s| format!("- SAT: {s}")));
        section.push(scores.act.map(|s| format!("- ACT: {s}")));
        if full {
            let ap = scores
                .ap_scores
                .iter()
                .filter_map(|s| text(&s.subject).map(|subject| format!("{subject} ({})", s.score)))
                .collect::<Vec<_>>();
            section.push(list_line("AP", &ap));
        }
    }

    if full {
        for achievement in non_empty(&student.academic_achievements) {
            section.lines.push(format!("- {achievement}"));
        }
        section.push(list_line("Courses", &non_empty(&student.courses_taken)));
        for award in non_empty(&student.awards_honors) {
            section.lines.push(format!("- Award: {award}"));
        }
    } else {
        section.push(list_line(
            "Achievements",
            &non_empty(&student.academic_achievements),
        ));
    }

    section
}

fn extracurricular(student: &StudentRecord, full: bool) -> Section {
    let mut section = Section::new("Extracurricular Activities");
    for activity in &student.extracurriculars {
        let line = item_line(
            &activity.name,
            &[&activity.role, &activity.duration],
            &activity.description,
        );
        let present = line.is_some();
        section.push(line);
        if full && present {
            section.detail("Impact", &activity.impact);
        }
    }
    section
}

fn leadership(student: &StudentRecord, full: bool) -> Section {
    let mut section = Section::new("Leadership Experience");
    for role in &student.leadership_roles {
        let title = [text(&role.position), text(&role.organization)]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" at ");

        if full {
            let line = item_line(&title, &[&role.duration], "");
            let present = line.is_some();
            section.push(line);
            if present {
                section.detail("Responsibilities", &role.responsibilities);
                section.detail("Achievements", &role.achievements);
            }
        } else {
            section.push(item_line(&title, &[], &role.achievements));
        }
    }
    section
}

fn service(student: &StudentRecord, full: bool) -> Section {
    let mut section = Section::new("Volunteer & Community Service");
    for work in &student.volunteer_work {
        let hours = work
            .hours
            .filter(|h| h.is_finite() && *h > 0.0)
            .map(|h| format!("{h} hours"))
            .unwrap_or_default();

        if full {
            let line = item_line(&work.organization, &[&work.role, &hours], "");
            let present = line.is_some();
            section.push(line);
            if present {
                section.detail("Story", &work.story);
                section.detail("Impact", &work.impact);
            }
        } else {
            section.push(item_line(&work.organization, &[&hours], &work.impact));
        }
    }
    if full {
        section.push(opt(&student.community_impact).map(|c| format!("- Community impact: {c}")));
    }
    section
}

fn projects(student: &StudentRecord, full: bool) -> Section {
    let mut section = Section::new("Projects & Innovation");
    for project in &student.projects {
        let line = item_line(&project.title, &[], &project.description);
        let present = line.is_some();
        section.push(line);
        if full && present {
            section.detail("Technologies", &non_empty(&project.technologies).join(", "));
            section.detail("Outcomes", &project.outcomes);
        }
    }
    section
}

fn narrative(student: &StudentRecord, full: bool) -> Section {
    let mut section = Section::new("Personal Background");
    section.push(opt(&student.background_story).map(|s| format!("Background: {s}")));
    section.push(opt(&student.challenges_overcome).map(|s| format!("Challenges: {s}")));
    section.push(opt(&student.future_goals).map(|s| format!("Goals: {s}")));
    if full {
        let values = non_empty(&student.personal_values);
        if !values.is_empty() {
            section.lines.push(format!("Values: {}", values.join(", ")));
        }
    }
    section
}

/// `- name (q1, q2): detail`, skipping whichever parts are empty.
fn item_line(name: &str, qualifiers: &[&str], detail: &str) -> Option<String> {
    let name = text(name);
    let qualifiers: Vec<&str> = qualifiers.iter().filter_map(|q| text(q)).collect();
    let detail = text(detail);

    if name.is_none() && qualifiers.is_empty() && detail.is_none() {
        return None;
    }

    let mut head = name.unwrap_or_default().to_string();
    if !qualifiers.is_empty() {
        if !head.is_empty() {
            head.push(' ');
        }
        head.push_str(&format!("({})", qualifiers.join(", ")));
    }

    Some(match detail {
        Some(detail) if head.is_empty() => format!("- {detail}"),
        Some(detail) => format!("- {head}: {detail}"),
        None => format!("- {head}"),
    })
}

fn list_line(label: &str, items: &[impl AsRef<str>]) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    let joined = items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!("- {label}: {joined}"))
}

fn text(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn opt(value: &Option<String>) -> Option<&str> {
    value.as_deref().and_then(text)
}

fn non_empty(items: &[String]) -> Vec<&str> {
    items.iter().filter_map(|s| text(s)).collect()
}
