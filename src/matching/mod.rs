//! Candidate filtering by skill profile and free-text search.

use std::collections::BTreeSet;

/// Recruiter-selectable skill categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Profile {
    Frontend,
    Backend,
    FullStack,
    Android,
    DataScience,
    MlAi,
    Flutter,
    ReactNative,
    DataEngineering,
    Ios,
    ScrumMaster,
    ProjectManager,
}

impl Profile {
    pub const ALL: [Profile; 12] = [
        Profile::Frontend,
        Profile::Backend,
        Profile::FullStack,
        Profile::Android,
        Profile::DataScience,
        Profile::MlAi,
        Profile::Flutter,
        Profile::ReactNative,
        Profile::DataEngineering,
        Profile::Ios,
        Profile::ScrumMaster,
        Profile::ProjectManager,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Profile::Frontend => "Frontend",
            Profile::Backend => "Backend",
            Profile::FullStack => "Full Stack",
            Profile::Android => "Android",
            Profile::DataScience => "Data Science",
            Profile::MlAi => "ML/AI",
            Profile::Flutter => "Flutter",
            Profile::ReactNative => "React Native",
            Profile::DataEngineering => "Data Engineering",
            Profile::Ios => "iOS",
            Profile::ScrumMaster => "Scrum Master",
            Profile::ProjectManager => "Project Manager",
        }
    }

    /// Lowercase keywords that indicate this profile
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Profile::Frontend => &[
                "react", "vue", "angular", "javascript", "html", "css", "bootstrap", "tailwind",
                "jquery", "typescript",
            ],
            Profile::Backend => &[
                "node", "express", "python", "django", "flask", "php", "laravel", "java",
                "spring", "ruby", "rails",
            ],
            Profile::FullStack => &[
                "mern", "mean", "javascript", "typescript", "react", "node", "express", "mongodb",
                "python", "django",
            ],
            Profile::Android => &[
                "kotlin", "java", "android studio", "xml", "firebase", "jetpack", "room",
                "rxjava", "mvvm",
            ],
            Profile::DataScience => &[
                "python", "r", "pandas", "numpy", "matplotlib", "scikit-learn", "jupyter",
                "statistics",
            ],
            Profile::MlAi => &[
                "tensorflow", "pytorch", "keras", "machine learning", "deep learning", "nlp",
                "computer vision",
            ],
            Profile::Flutter => &[
                "dart", "flutter", "mobile development", "cross-platform", "widgets", "bloc",
                "provider",
            ],
            Profile::ReactNative => &[
                "react native", "javascript", "typescript", "mobile", "cross-platform", "redux",
            ],
            Profile::DataEngineering => &[
                "etl", "spark", "hadoop", "sql", "nosql", "data warehouse", "kafka", "airflow",
            ],
            Profile::Ios => &[
                "swift", "objective-c", "xcode", "uikit", "swiftui", "core data", "cocoa",
            ],
            Profile::ScrumMaster => &[
                "agile", "scrum", "kanban", "jira", "confluence", "sprint planning",
                "retrospectives",
            ],
            Profile::ProjectManager => &[
                "pmp", "agile", "waterfall", "project planning", "risk management", "leadership",
            ],
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Profile::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown profile: {}", s))
    }
}

/// Skills text names the profile itself or any of its keywords (case-insensitive substring)
pub fn matches(candidate_skills: &str, profile: Profile) -> bool {
    let skills = candidate_skills.to_lowercase();
    skills.contains(&profile.name().to_lowercase())
        || profile.keywords().iter().any(|kw| skills.contains(kw))
}

/// Fields a candidate row exposes to filtering
pub trait Searchable {
    fn skills(&self) -> Option<&str>;

    /// Name, job title, skills, education, company
    fn search_fields(&self) -> Vec<Option<&str>>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateFilter {
    profiles: BTreeSet<Profile>,
    query: String,
}

impl CandidateFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the profile if absent, remove it if present
    pub fn toggle(&mut self, profile: Profile) -> &mut Self {
        if !self.profiles.remove(&profile) {
            self.profiles.insert(profile);
        }
        self
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profiles.insert(profile);
        self
    }

    pub fn set_query(&mut self, query: impl Into<String>) -> &mut Self {
        self.query = query.into().trim().to_lowercase();
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.set_query(query);
        self
    }

    pub fn clear(&mut self) {
        self.profiles.clear();
        self.query.clear();
    }

    pub fn profiles(&self) -> impl Iterator<Item = Profile> + '_ {
        self.profiles.iter().copied()
    }

    pub fn is_active(&self) -> bool {
        !self.profiles.is_empty() || !self.query.is_empty()
    }

    pub fn accepts<T: Searchable + ?Sized>(&self, row: &T) -> bool {
        self.skill_match(row) && self.query_match(row)
    }

    pub fn apply<'a, T: Searchable>(&self, rows: &'a [T]) -> Vec<&'a T> {
        rows.iter().filter(|row| self.accepts(*row)).collect()
    }

    fn skill_match<T: Searchable + ?Sized>(&self, row: &T) -> bool {
        if self.profiles.is_empty() {
            return true;
        }
        let skills = row.skills().unwrap_or_default();
        self.profiles.iter().any(|p| matches(skills, *p))
    }

    fn query_match<T: Searchable + ?Sized>(&self, row: &T) -> bool {
        if self.query.is_empty() {
            return true;
        }
        row.search_fields()
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&self.query))
    }
}

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based, clamped into range
    pub page: usize,
    pub total_pages: usize,
}

/// Slice one page out of `items`. Out-of-range pages clamp to the last one.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let per_page = per_page.max(1);
    let total_pages = items.len().div_ceil(per_page);
    let page = page.clamp(1, total_pages.max(1));
    let start = ((page - 1) * per_page).min(items.len());
    let end = (start + per_page).min(items.len());
    Page {
        items: &items[start..end],
        page,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        name: &'static str,
        title: &'static str,
        skills: Option<&'static str>,
    }

    impl Searchable for Row {
        fn skills(&self) -> Option<&str> {
            self.skills
        }

        fn search_fields(&self) -> Vec<Option<&str>> {
            vec![Some(self.name), Some(self.title), self.skills, None, None]
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "Ana", title: "UI Engineer", skills: Some("React, Node.js") },
            Row { name: "Ben", title: "Mainframe Dev", skills: Some("Cobol") },
            Row { name: "Cy", title: "iOS Dev", skills: Some("SwiftUI, Xcode") },
            Row { name: "Dee", title: "Intern", skills: None },
        ]
    }

    #[test]
    fn test_matches_keyword() {
        assert!(matches("React, Node.js", Profile::Frontend));
        assert!(!matches("Cobol", Profile::Frontend));
    }

    #[test]
    fn test_matches_profile_name_case_insensitive() {
        assert!(matches("Senior FRONTEND developer", Profile::Frontend));
        assert!(matches("did some ml/ai work", Profile::MlAi));
        assert!(matches("Machine Learning", Profile::MlAi));
        assert!(!matches("", Profile::Backend));
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!("full stack".parse::<Profile>().unwrap(), Profile::FullStack);
        assert_eq!("IOS".parse::<Profile>().unwrap(), Profile::Ios);
        assert!("Designer".parse::<Profile>().is_err());
    }

    #[test]
    fn test_profiles_combine_with_or() {
        let rows = rows();
        let filter = CandidateFilter::new()
            .with_profile(Profile::Frontend)
            .with_profile(Profile::Ios);
        let names: Vec<_> = filter.apply(&rows).iter().map(|r| r.name).collect();
        assert_eq!(names, ["Ana", "Cy"]);
    }

    #[test]
    fn test_query_combines_with_and() {
        let rows = rows();
        let filter = CandidateFilter::new()
            .with_profile(Profile::Frontend)
            .with_query("cy");
        assert!(filter.apply(&rows).is_empty());

        let filter = CandidateFilter::new().with_query("  ENGINEER ");
        let names: Vec<_> = filter.apply(&rows).iter().map(|r| r.name).collect();
        assert_eq!(names, ["Ana"]);
    }

    #[test]
    fn test_empty_filter_accepts_everything() {
        let rows = rows();
        let mut filter = CandidateFilter::new();
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&rows).len(), 4);

        filter.toggle(Profile::Backend);
        assert!(filter.is_active());
        filter.toggle(Profile::Backend);
        filter.set_query("x").clear();
        assert!(!filter.is_active());
    }

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (1..=23).collect();
        let first = paginate(&items, 1, DEFAULT_PAGE_SIZE);
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.total_pages, 3);

        let last = paginate(&items, 3, DEFAULT_PAGE_SIZE);
        assert_eq!(last.items, &[21, 22, 23]);

        let beyond = paginate(&items, 9, DEFAULT_PAGE_SIZE);
        assert_eq!(beyond.page, 3);

        let empty: Vec<u32> = Vec::new();
        let page = paginate(&empty, 0, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }
}
