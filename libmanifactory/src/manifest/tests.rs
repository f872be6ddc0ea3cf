use super::*;

const TEST_MANIFEST: &str = r#"{
    "schemaVersion": 2,
    "mediaType": "application/vnd.docker.distribution.manifest.v2+json",
    "config": {
        "mediaType": "application/vnd.docker.container.image.v1+json",
        "size": 7023,
        "digest": "sha256:b5b2b2c507a0944348e0303114d8d93aaaa081732b86451d9bce1f432a537bc7"
    },
    "layers": [
        {
            "mediaType": "application/vnd.docker.image.rootfs.diff.tar.gzip",
            "size": 32654,
            "digest": "sha256:e692418e4cbaf90ca69d05a66403747baa33ee08806650b51fab815ad7fc331f"
        },
        {
            "mediaType": "application/vnd.docker.image.rootfs.diff.tar.gzip",
            "size": 16724,
            "digest": "sha256:3c3a4604a545cdc127456d94e421cd355bca5b528f4a9c1905b15da2eb4a4c6b"
        }
    ]
}"#;

#[test]
fn test_manifest_deserialization() {
    let manifest: Manifest = serde_json::from_str(TEST_MANIFEST).unwrap();

    assert_eq!(manifest.schema_version, 2);
    assert_eq!(manifest.media_type, MANIFEST_V2_MEDIA_TYPE);
    assert_eq!(manifest.config.size, 7023);
    assert_eq!(
        manifest.config.digest,
        "sha256:b5b2b2c507a0944348e0303114d8d93aaaa081732b86451d9bce1f432a537bc7"
    );
    assert_eq!(manifest.layers.len(), 2);
    assert_eq!(manifest.layers[1].size, 16724);
}

#[test]
fn test_manifest_roundtrip_preserves_layer_order() {
    let manifest: Manifest = serde_json::from_str(TEST_MANIFEST).unwrap();

    let encoded = serde_json::to_string(&manifest).unwrap();
    let decoded: Manifest = serde_json::from_str(&encoded).unwrap();

    assert_eq!(decoded.layers.len(), 2);
    for (original, roundtripped) in manifest.layers.iter().zip(decoded.layers.iter()) {
        assert_eq!(original.digest, roundtripped.digest);
        assert_eq!(original.size, roundtripped.size);
        assert_eq!(original.media_type, roundtripped.media_type);
    }
    assert_eq!(decoded, manifest);
}

#[test]
fn test_manifest_serializes_camel_case() {
    let manifest: Manifest = serde_json::from_str(TEST_MANIFEST).unwrap();
    let encoded = serde_json::to_string(&manifest).unwrap();

    assert!(encoded.contains("\"schemaVersion\":2"));
    assert!(encoded.contains("\"mediaType\""));
    assert!(!encoded.contains("media_type"));
}

#[test]
fn test_manifest_missing_fields_default() {
    let manifest: Manifest = serde_json::from_str(r#"{"schemaVersion": 1}"#).unwrap();

    assert_eq!(manifest.schema_version, 1);
    assert!(manifest.media_type.is_empty());
    assert_eq!(manifest.config, Descriptor::default());
    assert!(manifest.layers.is_empty());
}


#[test]
fn test_is_manifest_list() {
    assert!(is_manifest_list(MANIFEST_LIST_MEDIA_TYPE));
    assert!(!is_manifest_list(MANIFEST_V2_MEDIA_TYPE));
    assert!(!is_manifest_list(""));
}

#[test]
fn test_manifest_or_list_from_ordinary_manifest() {
    let manifest: Manifest = serde_json::from_str(TEST_MANIFEST).unwrap();
    let outcome = ManifestOrList::from_manifest(manifest.clone());

    assert!(!outcome.is_skipped_list());
    assert_eq!(outcome.as_manifest(), Some(&manifest));
    assert_eq!(outcome.into_manifest(), manifest);
}

#[test]
fn test_manifest_or_list_skips_list() {
    let manifest = Manifest {
        schema_version: 2,
        media_type: MANIFEST_LIST_MEDIA_TYPE.to_string(),
        ..Default::default()
    };
    let outcome = ManifestOrList::from_manifest(manifest);

    assert!(outcome.is_skipped_list());
    assert_eq!(outcome.as_manifest(), None);
    assert_eq!(
        outcome,
        ManifestOrList::SkippedList {
            media_type: MANIFEST_LIST_MEDIA_TYPE.to_string()
        }
    );
    assert_eq!(outcome.into_manifest(), Manifest::default());
}
