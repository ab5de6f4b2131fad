use super::*;

#[test]
fn known_suffixes() {
    assert!(!is_known_image("foo.txt"));
    assert!(!is_known_image("/tmp/minimega/files/notes"));
    assert!(is_known_image("disk.qcow2"));
    assert!(is_known_image("disk.qc2"));
    assert!(is_known_image("rootfs_rootfs.tgz"));
    assert!(is_known_image("boot.iso"));
    assert!(is_known_image("legacy.hdd"));
    assert!(!is_known_image("plain.tgz"));
}

#[test]
fn classify_prefers_format() {
    assert_eq!(classify("anything.img", Some("qcow2")), Kind::VM);
    assert_eq!(classify("busybox_rootfs.tgz", Some("raw")), Kind::Container);
    assert_eq!(classify("legacy.hdd", None), Kind::VM);
    assert_eq!(classify("boot.iso", Some("raw")), Kind::ISO);
    assert_eq!(classify("disk.qc2", Some("raw")), Kind::Unknown);
    assert_eq!(classify("mystery", None), Kind::Unknown);
}

#[test]
fn base_names() {
    assert_eq!(base_name("/tmp/minimega/files/base.qcow2"), "base.qcow2");
    assert_eq!(base_name("base.qcow2"), "base.qcow2");
    assert_eq!(base_name(""), "");
}

#[test]
fn kind_names() {
    assert_eq!(Kind::from_name("vm"), Kind::VM);
    assert_eq!(Kind::from_name("VM"), Kind::VM);
    assert_eq!(Kind::from_name(" Container "), Kind::Container);
    assert_eq!(Kind::from_name("iso"), Kind::ISO);
    assert_eq!(Kind::from_name("unknown"), Kind::Unknown);
    assert_eq!(Kind::from_name("floppy"), Kind::Unknown);
    for kind in Kind::ALL.iter() {
        assert_eq!(Kind::from_name(kind.as_str()), *kind);
    }
}

#[test]
fn kind_sets() {
    let all = KindSet::parse("");
    assert_eq!(all, KindSet::all());
    assert!(Kind::ALL.iter().all(|kind| all.contains(*kind)));

    let some = KindSet::parse("vm,iso");
    assert!(some.contains(Kind::VM));
    assert!(some.contains(Kind::ISO));
    assert!(!some.contains(Kind::Container));
    assert!(!some.contains(Kind::Unknown));
    assert_eq!(some.to_string(), "VM,ISO");

    let odd: KindSet = "floppy".parse().unwrap();
    assert_eq!(odd, KindSet::empty().with(Kind::Unknown));
    assert_eq!(KindSet::parse(" "), KindSet::empty().with(Kind::Unknown));

    assert!(KindSet::empty().is_empty());
    assert!(!KindSet::empty().with(Kind::Container).is_empty());
}

#[test]
fn record_json_fields() {
    let record = ImageRecord {
        kind: Kind::VM,
        name: "child.qcow2".to_owned(),
        full_path: "/tmp/minimega/files/child.qcow2".to_owned(),
        host: None,
        size: "196K".to_owned(),
        virtual_size: "10G".to_owned(),
        experiment: None,
        backing_images: vec!["base.qcow2".to_owned()],
        in_use: true,
    };
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "kind": "VM",
            "name": "child.qcow2",
            "fullPath": "/tmp/minimega/files/child.qcow2",
            "size": "196K",
            "virtualSize": "10G",
            "experiment": null,
            "backingImages": ["base.qcow2"],
            "inUse": true,
        })
    );
    let back: ImageRecord = serde_json::from_value(value).unwrap();
    assert_eq!(back, record);
}
