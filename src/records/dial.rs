//! `DIAL` reconstructor (spec §4.4 "DIAL").
//!
//! A reconstructed `DIAL` is a [`Topic`] — the dialogue-graph builder
//! (spec §4.7) attaches [`crate::records::info::Dialogue`] entries to it
//! by `topic_form_id` / `speaker_form_id` once both tracks exist.

use crate::primitives::{read_cstr, read_u32};
use crate::records::{dedup_by_form_id_keep_best, iter_subrecords, ReconstructionContext};
use crate::types::{EditorId, FormId, Offset};

#[derive(Debug, Clone)]
pub struct Topic {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub speaker_form_id: Option<FormId>,
}

impl Topic {
    /// Tie-break key for spec §4.8 dedup: a non-null `speaker_form_id`
    /// wins, then the longer `full_name`, then the longer `editor_id`.
    #[must_use]
    pub fn richness_key(&self) -> (bool, usize, usize) {
        (
            self.speaker_form_id.is_some_and(|f| !f.is_null()),
            self.full_name.as_deref().map_or(0, str::len),
            self.editor_id.as_ref().map_or(0, |e| e.as_str().len()),
        )
    }
}

pub fn reconstruct(ctx: &ReconstructionContext<'_>) -> Vec<Topic> {
    let mut buf = Vec::with_capacity(ctx.config.dialogue_record_buffer_capacity);
    let mut out = Vec::new();

    for rec in &ctx.scan.main_records {
        if &rec.record_type != b"DIAL" {
            continue;
        }
        let stub = ctx.stub_fields(rec);
        let mut topic = Topic {
            form_id: rec.form_id,
            editor_id: stub.editor_id,
            full_name: stub.full_name,
            offset: rec.offset,
            is_big_endian: rec.is_big_endian,
            speaker_form_id: None,
        };

        if ctx.read_subrecord_stream(rec, &mut buf) {
            let endian = ctx.endian(rec);
            for (sig, data) in iter_subrecords(&buf, rec) {
                match &sig {
                    b"EDID" => {
                        if let Ok(s) = read_cstr(data, 0) {
                            topic.editor_id = EditorId::new(s);
                        }
                    }
                    b"FULL" => {
                        if let Ok(s) = read_cstr(data, 0) {
                            topic.full_name = Some(s);
                        }
                    }
                    b"TNAM" if data.len() >= 4 => {
                        if let Ok(fid) = read_u32(data, 0, endian) {
                            topic.speaker_form_id = Some(FormId(fid));
                        }
                    }
                    _ => {}
                }
            }
        }

        out.push(topic);
    }

    // Spec §4.8: a duplicate FormID keeps whichever instance has a
    // non-null speaker, then the longer full_name, then the longer
    // editor_id, rather than whichever scanned first.
    dedup_by_form_id_keep_best(out, |t| t.form_id, Topic::richness_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{Accessor, Logger, RuntimeReader};
    use crate::config::ReconstructionConfig;
    use crate::correlation::CorrelationMap;
    use crate::scan_result::{MainRecord, ScanResult};

    struct NullLogger;
    impl Logger for NullLogger {
        fn debug(&self, _m: &str) {}
    }
    struct NoRuntime;
    impl RuntimeReader for NoRuntime {}

    struct FakeAccessor {
        bytes: Vec<u8>,
    }
    impl Accessor for FakeAccessor {
        fn read_at(&self, offset: u64, dst: &mut [u8]) -> bool {
            let start = offset as usize;
            if start + dst.len() > self.bytes.len() {
                return false;
            }
            dst.copy_from_slice(&self.bytes[start..start + dst.len()]);
            true
        }
    }

    fn le_subrecord(sig: &[u8; 4], data: &[u8]) -> Vec<u8> {
        let mut out = sig.to_vec();
        out.extend_from_slice(&(data.len() as u16).to_le_bytes());
        out.extend_from_slice(data);
        out
    }

    #[test]
    fn reads_editor_id_full_name_and_speaker() {
        let mut body = le_subrecord(b"EDID", b"GREETING\0");
        body.extend(le_subrecord(b"FULL", b"Greeting\0"));
        body.extend(le_subrecord(b"TNAM", &0x1234u32.to_le_bytes()));

        let mut dump = vec![0u8; 24];
        dump.extend_from_slice(&body);
        let accessor = FakeAccessor { bytes: dump };

        let mut scan = ScanResult::default();
        scan.main_records.push(MainRecord {
            form_id: FormId(3),
            record_type: *b"DIAL",
            offset: 0,
            data_size: body.len() as u32,
            is_big_endian: false,
        });
        let correlation = CorrelationMap::build(&scan);
        let config = ReconstructionConfig::default();
        let logger = NullLogger;
        let ctx = ReconstructionContext {
            scan: &scan,
            correlation: &correlation,
            accessor: Some(&accessor),
            runtime: None,
            logger: &logger,
            config: &config,
        };

        let topics = reconstruct(&ctx);
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].editor_id.as_ref().unwrap().as_str(), "GREETING");
        assert_eq!(topics[0].full_name.as_deref(), Some("Greeting"));
        assert_eq!(topics[0].speaker_form_id, Some(FormId(0x1234)));
    }

    #[test]
    fn dedup_keeps_instance_with_speaker_over_longer_name() {
        let spoken = Topic {
            form_id: FormId(7),
            editor_id: None,
            full_name: Some("A".to_string()),
            offset: 0,
            is_big_endian: false,
            speaker_form_id: Some(FormId(0xAB)),
        };
        let unspoken_but_longer = Topic {
            form_id: FormId(7),
            editor_id: None,
            full_name: Some("A much longer topic name".to_string()),
            offset: 0,
            is_big_endian: true,
            speaker_form_id: None,
        };
        let deduped =
            dedup_by_form_id_keep_best(vec![unspoken_but_longer, spoken], |t| t.form_id, Topic::richness_key);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].speaker_form_id, Some(FormId(0xAB)));
    }
}
