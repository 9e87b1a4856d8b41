//! `QUST` reconstructor (spec §4.4 "QUST").

use crate::primitives::{read_cstr, read_u16, read_u32};
use crate::records::{dedup_by_form_id, iter_subrecords, ReconstructionContext};
use crate::types::{EditorId, FormId, Offset};

#[derive(Debug, Clone, Default)]
pub struct Stage {
    pub index: u16,
    pub log_text: Option<String>,
    pub flags: Option<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct Objective {
    pub index: u16,
    pub display_text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Quest {
    pub form_id: FormId,
    pub editor_id: Option<EditorId>,
    pub full_name: Option<String>,
    pub offset: Offset,
    pub is_big_endian: bool,
    pub flags: Option<u8>,
    pub priority: Option<u8>,
    pub script_form_id: Option<FormId>,
    pub stages: Vec<Stage>,
    pub objectives: Vec<Objective>,
}

pub fn reconstruct(ctx: &ReconstructionContext<'_>) -> Vec<Quest> {
    let mut buf = Vec::with_capacity(ctx.config.quest_record_buffer_capacity);
    let mut out = Vec::new();

    for rec in &ctx.scan.main_records {
        if &rec.record_type != b"QUST" {
            continue;
        }
        let stub = ctx.stub_fields(rec);
        let mut quest = Quest {
            form_id: rec.form_id,
            editor_id: stub.editor_id,
            full_name: stub.full_name,
            offset: rec.offset,
            is_big_endian: rec.is_big_endian,
            flags: None,
            priority: None,
            script_form_id: None,
            stages: Vec::new(),
            objectives: Vec::new(),
        };

        if ctx.read_subrecord_stream(rec, &mut buf) {
            let endian = ctx.endian(rec);
            let mut current_stage: Option<Stage> = None;
            let mut current_objective: Option<Objective> = None;

            for (sig, data) in iter_subrecords(&buf, rec) {
                match &sig {
                    b"EDID" => {
                        if let Ok(s) = read_cstr(data, 0) {
                            quest.editor_id = EditorId::new(s);
                        }
                    }
                    b"FULL" => {
                        if let Ok(s) = read_cstr(data, 0) {
                            quest.full_name = Some(s);
                        }
                    }
                    b"DATA" if data.len() >= 2 => {
                        quest.flags = Some(data[0]);
                        quest.priority = Some(data[1]);
                    }
                    b"SCRI" if data.len() >= 4 => {
                        if let Ok(fid) = read_u32(data, 0, endian) {
                            quest.script_form_id = Some(FormId(fid));
                        }
                    }
                    b"INDX" if data.len() >= 2 => {
                        if let Some(finished) = current_stage.take() {
                            quest.stages.push(finished);
                        }
                        let index = read_u16(data, 0, endian).unwrap_or(0);
                        current_stage = Some(Stage { index, ..Stage::default() });
                    }
                    b"CNAM" => {
                        if let Ok(text) = read_cstr(data, 0) {
                            let stage = current_stage.get_or_insert_with(Stage::default);
                            stage.log_text = Some(text);
                        }
                    }
                    b"QSDT" if !data.is_empty() => {
                        let stage = current_stage.get_or_insert_with(Stage::default);
                        stage.flags = Some(data[0]);
                    }
                    b"QOBJ" if data.len() >= 2 => {
                        if let Some(finished) = current_objective.take() {
                            quest.objectives.push(finished);
                        }
                        let index = read_u16(data, 0, endian).unwrap_or(0);
                        current_objective = Some(Objective { index, ..Objective::default() });
                    }
                    b"NNAM" => {
                        if let Ok(text) = read_cstr(data, 0) {
                            let mut objective = current_objective.take().unwrap_or_default();
                            objective.display_text = Some(text);
                            quest.objectives.push(objective);
                        }
                    }
                    _ => {}
                }
            }

            if let Some(finished) = current_stage.take() {
                quest.stages.push(finished);
            }
            if let Some(finished) = current_objective.take() {
                quest.objectives.push(finished);
            }
        }

        quest.stages.sort_by_key(|s| s.index);
        quest.objectives.sort_by_key(|o| o.index);
        out.push(quest);
    }

    dedup_by_form_id(out, |q| q.form_id)
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
    fn reads_data_flags_priority_and_script() {
        let mut body = le_subrecord(b"DATA", &[2u8, 50u8]);
        body.extend(le_subrecord(b"SCRI", &0x1234u32.to_le_bytes()));

        let mut dump = vec![0u8; 24];
        dump.extend_from_slice(&body);
        let accessor = FakeAccessor { bytes: dump };

        let mut scan = ScanResult::default();
        scan.main_records.push(MainRecord {
            form_id: FormId(4),
            record_type: *b"QUST",
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

        let quests = reconstruct(&ctx);
        assert_eq!(quests[0].flags, Some(2));
        assert_eq!(quests[0].priority, Some(50));
        assert_eq!(quests[0].script_form_id, Some(FormId(0x1234)));
    }

    #[test]
    fn accumulates_stages_and_objectives_in_index_order() {
        let mut body = le_subrecord(b"INDX", &20u16.to_le_bytes());
        body.extend(le_subrecord(b"CNAM", b"Stage twenty\0"));
        body.extend(le_subrecord(b"QSDT", &[1u8]));
        body.extend(le_subrecord(b"INDX", &10u16.to_le_bytes()));
        body.extend(le_subrecord(b"CNAM", b"Stage ten\0"));
        body.extend(le_subrecord(b"QOBJ", &1u16.to_le_bytes()));
        body.extend(le_subrecord(b"NNAM", b"Find the thing\0"));
        body.extend(le_subrecord(b"QOBJ", &0u16.to_le_bytes()));
        body.extend(le_subrecord(b"NNAM", b"Talk to someone\0"));

        let mut dump = vec![0u8; 24];
        dump.extend_from_slice(&body);
        let accessor = FakeAccessor { bytes: dump };

        let mut scan = ScanResult::default();
        scan.main_records.push(MainRecord {
            form_id: FormId(9),
            record_type: *b"QUST",
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

        let quests = reconstruct(&ctx);
        assert_eq!(quests.len(), 1);
        let q = &quests[0];
        assert_eq!(q.stages.len(), 2);
        assert_eq!(q.stages[0].index, 10);
        assert_eq!(q.stages[0].log_text.as_deref(), Some("Stage ten"));
        assert_eq!(q.stages[1].index, 20);
        assert_eq!(q.stages[1].flags, Some(1));

        assert_eq!(q.objectives.len(), 2);
        assert_eq!(q.objectives[0].index, 0);
        assert_eq!(q.objectives[0].display_text.as_deref(), Some("Talk to someone"));
        assert_eq!(q.objectives[1].index, 1);
    }

    #[test]
    fn unterminated_stage_flushes_at_end_of_subrecord_stream() {
        let body = le_subrecord(b"INDX", &5u16.to_le_bytes());
        let mut dump = vec![0u8; 24];
        dump.extend_from_slice(&body);
        let accessor = FakeAccessor { bytes: dump };

        let mut scan = ScanResult::default();
        scan.main_records.push(MainRecord {
            form_id: FormId(1),
            record_type: *b"QUST",
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
        let quests = reconstruct(&ctx);
        assert_eq!(quests[0].stages.len(), 1);
        assert_eq!(quests[0].stages[0].index, 5);
    }
}
