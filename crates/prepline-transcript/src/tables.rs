//! Ordered keyword and pattern tables driving extraction.
//!
//! Table order is significant: role and count lookups stop at the first hit,
//! and tech tags are reported in table order.

use std::sync::LazyLock;

use regex::Regex;

pub(crate) const BEHAVIORAL_MARKERS: &[&str] = &["behavioral", "behavior"];
pub(crate) const MIXED_MARKERS: &[&str] = &["mixed", "combination"];

pub(crate) const JUNIOR_MARKERS: &[&str] = &["junior", "entry", "beginner"];
pub(crate) const SENIOR_MARKERS: &[&str] = &["senior", "lead", "principal"];

/// (keyword, canonical role). First contained keyword wins.
pub(crate) const ROLE_KEYWORDS: &[(&str, &str)] = &[
    ("frontend", "Frontend Developer"),
    ("front-end", "Frontend Developer"),
    ("front end", "Frontend Developer"),
    ("backend", "Backend Developer"),
    ("back-end", "Backend Developer"),
    ("back end", "Backend Developer"),
    ("full stack", "Full Stack Developer"),
    ("fullstack", "Full Stack Developer"),
    ("data scientist", "Data Scientist"),
    ("data analyst", "Data Analyst"),
    ("product manager", "Product Manager"),
    ("devops", "DevOps Engineer"),
    ("qa", "QA Engineer"),
    ("quality assurance", "QA Engineer"),
    ("mobile", "Mobile Developer"),
    ("android", "Android Developer"),
    ("ios", "iOS Developer"),
    ("software engineer", "Software Engineer"),
    ("developer", "Software Developer"),
];

pub(crate) const TECH_KEYWORDS: &[&str] = &[
    "react",
    "angular",
    "vue",
    "svelte",
    "javascript",
    "typescript",
    "python",
    "java",
    "node",
    "nodejs",
    "express",
    "mongodb",
    "mysql",
    "postgresql",
    "sql",
    "aws",
    "docker",
    "kubernetes",
    "git",
    "html",
    "css",
    "sass",
    "redux",
    "graphql",
    "rest",
    "api",
    "microservices",
    "spring",
    "django",
    "flask",
    "laravel",
    "php",
    "ruby",
    "rails",
    "golang",
    "rust",
    "c++",
    "c#",
    "dotnet",
    ".net",
];

pub(crate) const NUMBER_WORDS: &[(&str, u64)] = &[
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
];

/// Question-count patterns, tried in order. Group 1 holds the number.
pub(crate) static COUNT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(\d+)\s*(questions?|interview)",
        r"(three|four|five|six|seven|eight|nine|ten)\s*(questions?)",
        r"prepare\s+(\d+)",
        r"(\d+)\s*mock",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

// Narrower tables used on a vendor's raw transcript string.

pub(crate) const VENDOR_ROLE_PHRASES: &[&str] = &[
    "software engineer",
    "frontend developer",
    "backend developer",
    "full stack developer",
    "data scientist",
    "product manager",
    "devops engineer",
    "mobile developer",
];

pub(crate) const VENDOR_TECH_KEYWORDS: &[&str] = &[
    "javascript",
    "typescript",
    "react",
    "angular",
    "vue",
    "node",
    "python",
    "java",
    "spring",
    "express",
    "mongodb",
    "sql",
    "aws",
];

pub(crate) static VENDOR_COUNT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*questions?").unwrap());
