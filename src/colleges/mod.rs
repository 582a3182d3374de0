use anyhow::Result;
use serde::Serialize;

use crate::student::{CollegeCategory, CollegeListEntry};

#[derive(Debug, Clone, Default, Serialize)]
pub struct CollegeGroups<'a> {
    pub reach: Vec<&'a CollegeListEntry>,
    pub target: Vec<&'a CollegeListEntry>,
    pub safety: Vec<&'a CollegeListEntry>,
}

impl<'a> CollegeGroups<'a> {
    pub fn get(&self, category: CollegeCategory) -> &[&'a CollegeListEntry] {
        match category {
            CollegeCategory::Reach => &self.reach,
            CollegeCategory::Target => &self.target,
            CollegeCategory::Safety => &self.safety,
        }
    }
}

/// Split a college list into reach, target and safety schools, keeping list order
pub fn group_by_category<'a, I>(entries: I) -> CollegeGroups<'a>
where
    I: IntoIterator<Item = &'a CollegeListEntry>,
{
    let mut groups = CollegeGroups::default();
    for entry in entries {
        match entry.category {
            CollegeCategory::Reach => groups.reach.push(entry),
            CollegeCategory::Target => groups.target.push(entry),
            CollegeCategory::Safety => groups.safety.push(entry),
        }
    }
    groups
}

/// Case-insensitive match against name, city and state. An empty query matches all.
pub fn search<'a>(entries: &'a [CollegeListEntry], query: &str) -> Vec<&'a CollegeListEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return entries.iter().collect();
    }

    let contains = |field: Option<&str>| field.is_some_and(|f| f.to_lowercase().contains(&needle));

    entries
        .iter()
        .filter(|e| {
            contains(Some(&e.college_name)) || contains(e.city.as_deref()) || contains(e.state.as_deref())
        })
        .collect()
}

/// Add a college to the list. A college can only be on the list once.
pub fn add_college(list: &mut Vec<CollegeListEntry>, entry: CollegeListEntry) -> Result<()> {
    if list.iter().any(|c| c.id == entry.id) {
        anyhow::bail!("College already on your list: {}", entry.college_name);
    }
    list.push(entry);
    Ok(())
}

/// Remove a college by id, returning the removed entry
pub fn remove_college(list: &mut Vec<CollegeListEntry>, id: &str) -> Result<CollegeListEntry> {
    match list.iter().position(|c| c.id == id) {
        Some(idx) => Ok(list.remove(idx)),
        None => anyhow::bail!("No college with id '{}' on your list", id),
    }
}
