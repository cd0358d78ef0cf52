use std::{cmp::Ordering, time::SystemTime};

use crate::images::resolve::ImageFile;
use crate::request::model::SortKey;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum KeyValue {
    Name(std::ffi::OsString),
    Date(SystemTime),
    Bytes(u64),
    Pixels(u64),
}

fn read_key(image: &ImageFile, key: SortKey) -> Option<KeyValue> {
    let value = match key {
        SortKey::Name => Ok(KeyValue::Name(image.path().as_os_str().to_os_string())),
        SortKey::Date => image.created_at().map(KeyValue::Date),
        SortKey::Size => image.byte_size().map(KeyValue::Bytes),
        SortKey::Resolution => image.pixel_dimensions().map(|r| KeyValue::Pixels(r.area())),
    };
    match value {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(
                path = %image.path().display(),
                ?key,
                error = %e,
                "sort key unavailable, placing image last"
            );
            None
        }
    }
}

/// Order `images` by `key`, reversing the comparison when `descending`.
///
/// Each key is read once per image. The sort is stable in both directions: images with equal
/// keys keep their input order. Images whose key cannot be read go last, in input order.
#[tracing::instrument(skip(images), fields(count = images.len()))]
pub fn order_images(images: Vec<ImageFile>, key: SortKey, descending: bool) -> Vec<ImageFile> {
    let mut keyed: Vec<(Option<KeyValue>, ImageFile)> = images
        .into_iter()
        .map(|img| (read_key(&img, key), img))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => {
            let ord = a.cmp(b);
            if descending { ord.reverse() } else { ord }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    keyed.into_iter().map(|(_, img)| img).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/images/order.rs"]
mod tests;
