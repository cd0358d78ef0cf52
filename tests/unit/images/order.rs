use std::path::Path;

use super::*;

fn write_bytes(dir: &Path, name: &str, len: usize) -> ImageFile {
    let p = dir.join(name);
    std::fs::write(&p, vec![0u8; len]).unwrap();
    ImageFile::new(p)
}

fn write_png(dir: &Path, name: &str, w: u32, h: u32) -> ImageFile {
    let p = dir.join(name);
    image::RgbImage::from_pixel(w, h, image::Rgb([9, 9, 9]))
        .save(&p)
        .unwrap();
    ImageFile::new(p)
}

fn names(images: &[ImageFile]) -> Vec<String> {
    images
        .iter()
        .map(|i| i.path().file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn name_order_is_lexicographic_path_order() {
    let input: Vec<_> = ["b.png", "a.png", "c.png", "B.png"]
        .into_iter()
        .map(|n| ImageFile::new(Path::new("in").join(n)))
        .collect();
    let out = order_images(input.clone(), SortKey::Name, false);
    assert_eq!(names(&out), vec!["B.png", "a.png", "b.png", "c.png"]);

    let mut expected: Vec<String> = input
        .iter()
        .map(|i| i.path().to_string_lossy().into_owned())
        .collect();
    expected.sort();
    let got: Vec<String> = out
        .iter()
        .map(|i| i.path().to_string_lossy().into_owned())
        .collect();
    assert_eq!(got, expected);
}

#[test]
fn descending_reverses_distinct_keys() {
    let dir = tempfile::tempdir().unwrap();
    let input = vec![
        write_png(dir.path(), "m.png", 3, 3),
        write_png(dir.path(), "a.png", 1, 1),
        write_png(dir.path(), "z.png", 40, 40),
    ];
    for key in [SortKey::Name, SortKey::Resolution] {
        let asc = order_images(input.clone(), key, false);
        let mut desc = order_images(input.clone(), key, true);
        desc.reverse();
        assert_eq!(asc, desc, "{key:?}");
    }
    assert_eq!(
        names(&order_images(input, SortKey::Resolution, true)),
        vec!["z.png", "m.png", "a.png"]
    );
}

#[test]
fn output_is_a_permutation_of_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = vec![
        write_bytes(dir.path(), "1.png", 30),
        write_bytes(dir.path(), "2.png", 10),
        write_bytes(dir.path(), "3.png", 20),
        write_bytes(dir.path(), "4.png", 10),
    ];
    for key in [SortKey::Name, SortKey::Date, SortKey::Size, SortKey::Resolution] {
        for descending in [false, true] {
            let mut out = order_images(input.clone(), key, descending);
            assert_eq!(out.len(), input.len());
            out.sort_by(|a, b| a.path().cmp(b.path()));
            assert_eq!(out, input, "{key:?} desc={descending}");
        }
    }
}

#[test]
fn size_order_is_stable_for_equal_keys() {
    let dir = tempfile::tempdir().unwrap();
    let input = vec![
        write_bytes(dir.path(), "x.png", 10),
        write_bytes(dir.path(), "big.png", 50),
        write_bytes(dir.path(), "a.png", 10),
        write_bytes(dir.path(), "m.png", 10),
    ];
    let asc = order_images(input.clone(), SortKey::Size, false);
    assert_eq!(names(&asc), vec!["x.png", "a.png", "m.png", "big.png"]);

    let desc = order_images(input, SortKey::Size, true);
    assert_eq!(names(&desc), vec!["big.png", "x.png", "a.png", "m.png"]);
}

#[test]
fn resolution_order_uses_pixel_area_and_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let input = vec![
        write_png(dir.path(), "wide.png", 8, 2),
        write_png(dir.path(), "tiny.png", 2, 2),
        write_png(dir.path(), "tall.png", 2, 8),
        write_png(dir.path(), "square.png", 4, 4),
    ];
    let out = order_images(input, SortKey::Resolution, false);
    assert_eq!(
        names(&out),
        vec!["tiny.png", "wide.png", "tall.png", "square.png"]
    );
}

#[test]
fn date_order_follows_creation_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_bytes(dir.path(), "z.png", 1);
    std::thread::sleep(std::time::Duration::from_millis(50));
    let second = write_bytes(dir.path(), "a.png", 1);
    std::thread::sleep(std::time::Duration::from_millis(50));
    let third = write_bytes(dir.path(), "m.png", 1);

    let input = vec![third.clone(), first.clone(), second.clone()];
    assert_eq!(
        order_images(input.clone(), SortKey::Date, false),
        vec![first.clone(), second.clone(), third.clone()]
    );
    assert_eq!(
        order_images(input, SortKey::Date, true),
        vec![third, second, first]
    );
}

#[test]
fn unreadable_keys_go_last_in_input_order() {
    let dir = tempfile::tempdir().unwrap();
    let broken_b = write_bytes(dir.path(), "broken_b.png", 4);
    let good = write_png(dir.path(), "good.png", 2, 2);
    let broken_a = write_bytes(dir.path(), "broken_a.png", 4);
    let big = write_png(dir.path(), "big.png", 6, 6);

    let input = vec![broken_b.clone(), good.clone(), broken_a.clone(), big.clone()];
    for descending in [false, true] {
        let out = order_images(input.clone(), SortKey::Resolution, descending);
        assert_eq!(&out[2..], &[broken_b.clone(), broken_a.clone()]);
    }
}
