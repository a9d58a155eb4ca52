/// Accumulates the MD5 digest of each part in part-number order and derives
/// the ETag that S3 reports for the completed object.
#[derive(Debug, Default, Clone)]
pub struct ETagHasher {
    concatenated_md5_hash: Vec<u8>,
    parts_count: i64,
}

impl ETagHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, part: &[u8]) {
        self.concatenated_md5_hash
            .extend_from_slice(md5::compute(part).as_slice());
        self.parts_count += 1;
    }

    pub fn parts_count(&self) -> i64 {
        self.parts_count
    }

    /// Without any part this is the ETag of an empty single-part object.
    pub fn finish(&self) -> String {
        if self.parts_count == 0 {
            return generate_e_tag_hash(md5::compute(b"").as_slice(), 0);
        }

        generate_e_tag_hash(&self.concatenated_md5_hash, self.parts_count)
    }
}

pub fn verify_e_tag(expected_e_tag: &str, target_e_tag: &Option<String>) -> Option<bool> {
    target_e_tag
        .as_ref()
        .map(|target_e_tag| normalize_e_tag(expected_e_tag) == normalize_e_tag(target_e_tag))
}

pub fn generate_e_tag_hash(concatnated_md5_hash: &[u8], parts_count: i64) -> String {
    if parts_count == 0 {
        format!("{:?}", hex::encode(concatnated_md5_hash))
    } else {
        format!(
            "\"{:?}-{}\"",
            md5::compute(concatnated_md5_hash),
            parts_count
        )
    }
}

fn normalize_e_tag(e_tag: &str) -> String {
    e_tag.replace('\"', "")
}
