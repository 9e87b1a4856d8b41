//! `INFO` reconstructor (spec §4.4 "INFO").
//!
//! Each reconstructed `INFO` becomes a [`Dialogue`] — the term the spec
//! uses for an individual response-tree entry once it's folded into the
//! dialogue graph (spec §4.7, §8 scenario S3).

use crate::primitives::{read_cstr, read_i32, read_u32};
use crate::records::{dedup_by_form_id_keep_best, iter_subrecords, ReconstructionContext};
use crate::types::{Endianness, FormId, Offset};

#[derive(Debug, Clone, Default)]
pub struct Response {
    pub text: Option<String>,
    pub emotion_type: Option<u32>,
    pub emotion_value: Option<i32>,
    pub response_number: Option<u8>,
}

impl Response {
    fn text_len(&self) -> usize {
        self.text.as_ref().map_or(0, String::len)
    }
}

#[derive(Debug, Clone)]
pub struct Dialogue {
    pub form_id: FormId,
    pub editor_id: Option<crate::types::EditorId>,
    pub offset: Offset,
    pub is_big_endian: bool,

    pub quest_form_id: Option<FormId>,
    pub topic_form_id: Option<FormId>,
    pub previous_info_form_id: Option<FormId>,
    pub speaker_form_id: Option<FormId>,
    pub link_to_topics: Vec<FormId>,
    pub link_from_topics: Vec<FormId>,
    pub add_topics: Vec<FormId>,
    pub difficulty: u32,
    pub responses: Vec<Response>,
    /// Filled by the dialogue-graph builder from the runtime
    /// `TESTopicInfo` struct; used for within-topic ordering (spec §3).
    pub info_index: Option<i32>,
    pub prompt_text: Option<String>,
    pub info_flags: Option<u32>,
}

impl Dialogue {
    /// Tie-break key for spec §4.8 dedup: most responses wins, ties broken
    /// by total response text length.
    #[must_use]
    pub fn richness_key(&self) -> (usize, usize) {
        (self.responses.len(), self.responses.iter().map(Response::text_len).sum())
    }
}

pub fn reconstruct(ctx: &ReconstructionContext<'_>) -> Vec<Dialogue> {
    let mut buf = Vec::with_capacity(ctx.config.dialogue_record_buffer_capacity);
    let mut out = Vec::new();

    for rec in &ctx.scan.main_records {
        if &rec.record_type != b"INFO" {
            continue;
        }
        let stub = ctx.stub_fields(rec);
        let mut dialogue = Dialogue {
            form_id: rec.form_id,
            editor_id: stub.editor_id,
            offset: rec.offset,
            is_big_endian: rec.is_big_endian,
            quest_form_id: None,
            topic_form_id: None,
            previous_info_form_id: None,
            speaker_form_id: None,
            link_to_topics: Vec::new(),
            link_from_topics: Vec::new(),
            add_topics: Vec::new(),
            difficulty: 0,
            responses: Vec::new(),
            info_index: None,
            prompt_text: None,
            info_flags: None,
        };

        if ctx.read_subrecord_stream(rec, &mut buf) {
            let endian = ctx.endian(rec);
            let mut current: Option<Response> = None;
            for (sig, data) in iter_subrecords(&buf, rec) {
                match &sig {
                    b"QSTI" if data.len() >= 4 => {
                        dialogue.quest_form_id = read_form_id(data, endian);
                    }
                    b"TPIC" if data.len() >= 4 => {
                        dialogue.topic_form_id = read_form_id(data, endian);
                    }
                    b"PNAM" if data.len() >= 4 => {
                        dialogue.previous_info_form_id = read_form_id(data, endian);
                    }
                    b"ANAM" if data.len() >= 4 => {
                        dialogue.speaker_form_id = read_form_id(data, endian);
                    }
                    b"TCLT" if data.len() >= 4 => {
                        if let Some(fid) = read_form_id(data, endian) {
                            if !fid.is_null() {
                                dialogue.link_to_topics.push(fid);
                            }
                        }
                    }
                    b"TCLF" if data.len() >= 4 => {
                        if let Some(fid) = read_form_id(data, endian) {
                            dialogue.link_from_topics.push(fid);
                        }
                    }
                    b"NAME" if data.len() >= 4 => {
                        if let Some(fid) = read_form_id(data, endian) {
                            dialogue.add_topics.push(fid);
                        }
                    }
                    b"DNAM" if data.len() >= 4 => {
                        if let Ok(v) = read_u32(data, 0, endian) {
                            dialogue.difficulty = if v > 10 { 0 } else { v };
                        }
                    }
                    b"NAM1" => {
                        if let Some(finished) = current.take() {
                            dialogue.responses.push(finished);
                        }
                        let text = read_cstr(data, 0).ok();
                        current = Some(Response { text, ..Response::default() });
                    }
                    b"TRDT" if data.len() >= 20 => {
                        let emotion_type = read_u32(data, 0, endian).ok();
                        let emotion_value = read_i32(data, 4, endian).ok();
                        let response_number = data.get(8).copied();
                        let response = current.get_or_insert_with(Response::default);
                        response.emotion_type = emotion_type;
                        response.emotion_value = emotion_value;
                        response.response_number = response_number;
                    }
                    _ => {}
                }
            }
            if let Some(finished) = current.take() {
                dialogue.responses.push(finished);
            }
        }

        out.push(dialogue);
    }

    // Spec §4.8/§8 S6: duplicate FormIDs from re-decoding the same record
    // under both endian guesses keep whichever instance carries the richer
    // response set, not whichever happened to scan first.
    dedup_by_form_id_keep_best(out, |d| d.form_id, Dialogue::richness_key)
}

fn read_form_id(data: &[u8], endian: Endianness) -> Option<FormId> {
    read_u32(data, 0, endian).ok().map(FormId)
}
