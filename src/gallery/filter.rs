use std::collections::BTreeMap;

use crate::scanner::ImageRecord;
use crate::util::locale_cmp;

/// Does an image match the gallery search box?
///
/// A term starting with `-` matches images having no tag that contains the
/// rest of the term. Any other term matches on filename or tag substring.
/// Matching is case-insensitive and an empty term matches everything.
pub fn matches_search(image: &ImageRecord, term: &str) -> bool {
    let search = term.trim().to_lowercase();
    if search.is_empty() {
        return true;
    }

    let tag_contains = |needle: &str| image.tags.iter().any(|t| t.to_lowercase().contains(needle));

    match search.strip_prefix('-') {
        Some(missing) => !tag_contains(missing),
        None => image.name.to_lowercase().contains(&search) || tag_contains(search.as_str()),
    }
}

pub fn filter_images<'a>(images: &'a [ImageRecord], term: &str) -> Vec<&'a ImageRecord> {
    images.iter().filter(|i| matches_search(i, term)).collect()
}

/// Group images by their directory. Groups are ordered by directory name;
/// images keep their incoming order within a group.
pub fn group_by_directory<'a, I>(images: I) -> Vec<(String, Vec<&'a ImageRecord>)>
where
    I: IntoIterator<Item = &'a ImageRecord>,
{
    let mut grouped: BTreeMap<&str, Vec<&ImageRecord>> = BTreeMap::new();
    for image in images {
        let key = if image.directory.is_empty() {
            "Unknown"
        } else {
            image.directory.as_str()
        };
        grouped.entry(key).or_default().push(image);
    }

    let mut groups: Vec<(String, Vec<&ImageRecord>)> = grouped
        .into_iter()
        .map(|(dir, images)| (dir.to_string(), images))
        .collect();
    groups.sort_by(|a, b| locale_cmp(&a.0, &b.0));
    groups
}
