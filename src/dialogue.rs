//! Dialogue graph builder (spec §4.7): links reconstructed `INFO`s
//! (`Dialogue`), `DIAL`s (`Topic`), and `QUST`s into a quest-rooted tree.

use std::collections::HashMap;

use crate::records::dial::Topic;
use crate::records::info::Dialogue;
use crate::records::qust::Quest;
use crate::records::ReconstructionContext;
use crate::types::FormId;

#[derive(Debug, Clone)]
pub struct InfoDialogueNode {
    pub dialogue: Dialogue,
    pub linked_topics: Vec<FormId>,
}

#[derive(Debug, Clone)]
pub struct TopicDialogueNode {
    pub topic_form_id: Option<FormId>,
    pub editor_id: Option<String>,
    pub full_name: Option<String>,
    pub quest_form_id: Option<FormId>,
    /// The owning quest's `DATA.priority` (spec §3, §4.7 step 7: "sort
    /// topics by descending priority, then by topic name"), `0` if the
    /// topic has no quest or the quest carries no `DATA` subrecord.
    pub priority: u8,
    /// `true` for the synthetic `"(Unlinked Responses)"` bucket (spec §4.7
    /// step 7's final clause), `false` for a real topic node.
    pub is_unlinked_bucket: bool,
    pub infos: Vec<InfoDialogueNode>,
}

#[derive(Debug, Clone)]
pub struct QuestDialogueGroup {
    pub quest_form_id: FormId,
    pub topics: Vec<TopicDialogueNode>,
}

#[derive(Debug, Clone, Default)]
pub struct DialogueTree {
    pub quests: Vec<QuestDialogueGroup>,
    pub orphan_topics: Vec<TopicDialogueNode>,
}

/// Runs spec §4.7's seven stages in order. Takes ownership of the ESM-plus-
/// runtime-merged `dialogues` and `topics` lists; `quests` is only read
/// (for the EditorID-convention fallback and quest grouping).
pub fn build(
    ctx: &ReconstructionContext<'_>,
    mut dialogues: Vec<Dialogue>,
    mut topics: Vec<Topic>,
    quests: &[Quest],
) -> DialogueTree {
    // Step 1: detect the runtime form-type byte used for DIAL.
    if let Some(form_type) = detect_topic_form_type(ctx, &topics) {
        if let Some(runtime) = ctx.runtime {
            // Step 2: merge runtime topic data using the detected type.
            merge_runtime_topics(runtime, form_type, &mut topics);

            // Step 3 + 4: walk m_listQuestInfo, link/create dialogues, then
            // enrich every dialogue (old and new) from TESTopicInfo.
            let mut va_by_form_id: HashMap<FormId, u64> = HashMap::new();
            for topic in &topics {
                for list in runtime.walk_topic_quest_info_list(topic.form_id) {
                    for info in &list.infos {
                        va_by_form_id.insert(info.form_id, info.virtual_address);
                        if let Some(existing) =
                            dialogues.iter_mut().find(|d| d.form_id == info.form_id)
                        {
                            if existing.topic_form_id.is_none() {
                                existing.topic_form_id = Some(topic.form_id);
                            }
                            if existing.quest_form_id.is_none() {
                                existing.quest_form_id = Some(list.quest_form_id);
                            }
                        } else if let Some(rt) = runtime.read_runtime_dialogue_info(info.virtual_address) {
                            dialogues.push(Dialogue {
                                form_id: info.form_id,
                                editor_id: rt.editor_id.clone().and_then(crate::types::EditorId::new),
                                offset: rt.offset,
                                is_big_endian: true,
                                quest_form_id: Some(list.quest_form_id),
                                topic_form_id: Some(topic.form_id),
                                previous_info_form_id: None,
                                speaker_form_id: rt.speaker_form_id,
                                link_to_topics: Vec::new(),
                                link_from_topics: Vec::new(),
                                add_topics: Vec::new(),
                                difficulty: rt.difficulty.unwrap_or(0),
                                responses: Vec::new(),
                                info_index: rt.info_index,
                                prompt_text: rt.prompt_text.clone(),
                                info_flags: rt.info_flags,
                            });
                        }
                    }
                }
            }

            for dialogue in &mut dialogues {
                let Some(&va) = va_by_form_id.get(&dialogue.form_id) else { continue };
                let Some(rt) = runtime.read_runtime_dialogue_info(va) else { continue };
                enrich_dialogue_from_runtime(dialogue, &rt);
            }
        }
    }

    // Step 5: propagate topic-level speaker to unspoken INFOs.
    propagate_topic_speaker(&topics, &mut dialogues);

    // Step 6: EditorID-convention fallback for still-unlinked dialogues.
    apply_editor_id_convention_fallback(quests, &mut dialogues);

    // Step 7: tree construction.
    construct_tree(topics, dialogues, quests)
}

fn detect_topic_form_type(ctx: &ReconstructionContext<'_>, topics: &[Topic]) -> Option<u8> {
    let runtime = ctx.runtime?;
    let known_dial_ids: std::collections::HashSet<FormId> =
        topics.iter().map(|t| t.form_id).collect();
    if known_dial_ids.is_empty() {
        // Nothing to cross-reference against; still try the 0x45 fallback.
        return detect_via_probe(runtime, ctx);
    }

    let mut best: Option<(u8, usize)> = None;
    for byte in 0u8..=255 {
        let ids = runtime.runtime_form_ids_for_type(byte);
        if ids.is_empty() {
            continue;
        }
        let matches = ids.iter().filter(|id| known_dial_ids.contains(id)).count();
        if matches > best.map_or(0, |(_, m)| m) {
            best = Some((byte, matches));
        }
    }
    if let Some((byte, matches)) = best {
        if matches >= ctx.config.topic_form_type_match_threshold {
            return Some(byte);
        }
    }

    detect_via_probe(runtime, ctx)
}

fn detect_via_probe(
    runtime: &dyn crate::capabilities::RuntimeReader,
    ctx: &ReconstructionContext<'_>,
) -> Option<u8> {
    const FALLBACK_FORM_TYPE: u8 = crate::form_type::RuntimeFormType::DialogOrInfoFallback as u8;
    let ids = runtime.runtime_form_ids_for_type(FALLBACK_FORM_TYPE);
    if ids.is_empty() {
        return None;
    }
    let successes = ids
        .iter()
        .take(ctx.config.topic_form_type_probe_sample)
        .filter(|id| runtime.read_runtime_dialogue_topic(**id).is_some())
        .count();
    (successes >= ctx.config.topic_form_type_probe_threshold).then_some(FALLBACK_FORM_TYPE)
}

fn merge_runtime_topics(
    runtime: &dyn crate::capabilities::RuntimeReader,
    form_type: u8,
    topics: &mut Vec<Topic>,
) {
    for form_id in runtime.runtime_form_ids_for_type(form_type) {
        let Some(rt) = runtime.read_runtime_dialogue_topic(form_id) else { continue };
        if let Some(existing) = topics.iter_mut().find(|t| t.form_id == form_id) {
            if existing.editor_id.is_none() {
                existing.editor_id = rt.editor_id.clone().and_then(crate::types::EditorId::new);
            }
            if existing.full_name.is_none() {
                existing.full_name = rt.full_name.clone();
            }
            if existing.speaker_form_id.is_none() {
                existing.speaker_form_id = rt.speaker_form_id;
            }
        } else {
            topics.push(Topic {
                form_id,
                editor_id: rt.editor_id.clone().and_then(crate::types::EditorId::new),
                full_name: rt.full_name.clone(),
                offset: rt.offset,
                is_big_endian: true,
                speaker_form_id: rt.speaker_form_id,
            });
        }
    }
}

fn enrich_dialogue_from_runtime(dialogue: &mut Dialogue, rt: &crate::capabilities::RuntimeDialogueInfo) {
    if dialogue.editor_id.is_none() {
        dialogue.editor_id = rt.editor_id.clone().and_then(crate::types::EditorId::new);
    }
    if dialogue.prompt_text.is_none() {
        dialogue.prompt_text = rt.prompt_text.clone();
    }
    if dialogue.info_index.is_none() {
        dialogue.info_index = rt.info_index;
    }
    if dialogue.info_flags.is_none() {
        dialogue.info_flags = rt.info_flags;
    }
    if let Some(difficulty) = rt.difficulty {
        if difficulty > 0 {
            dialogue.difficulty = difficulty;
        }
    }
    if dialogue.speaker_form_id.is_none() {
        dialogue.speaker_form_id = rt.speaker_form_id;
    }
    if dialogue.quest_form_id.is_none() {
        dialogue.quest_form_id = rt.quest_form_id;
    }
}

fn propagate_topic_speaker(topics: &[Topic], dialogues: &mut [Dialogue]) {
    for topic in topics {
        let Some(speaker) = topic.speaker_form_id else { continue };
        for dialogue in dialogues.iter_mut() {
            if dialogue.topic_form_id != Some(topic.form_id) {
                continue;
            }
            let has_speaker = dialogue.speaker_form_id.is_some_and(|f| !f.is_null());
            if !has_speaker {
                dialogue.speaker_form_id = Some(speaker);
            }
        }
    }
}

fn apply_editor_id_convention_fallback(quests: &[Quest], dialogues: &mut [Dialogue]) {
    for dialogue in dialogues.iter_mut() {
        if dialogue.topic_form_id.is_some() {
            continue;
        }
        let Some(editor_id) = &dialogue.editor_id else { continue };
        let lower = editor_id.as_str().to_lowercase();

        let best = quests
            .iter()
            .filter_map(|q| {
                let quest_editor_id = q.editor_id.as_ref()?;
                let quest_lower = quest_editor_id.as_str().to_lowercase();
                lower.starts_with(&quest_lower).then_some((quest_lower.len(), q.form_id))
            })
            .max_by_key(|&(len, _)| len);

        if let Some((_, quest_form_id)) = best {
            dialogue.quest_form_id = Some(quest_form_id);
        }
    }
}

fn construct_tree(topics: Vec<Topic>, dialogues: Vec<Dialogue>, quests: &[Quest]) -> DialogueTree {
    let quest_priority: HashMap<FormId, u8> =
        quests.iter().map(|q| (q.form_id, q.priority.unwrap_or(0))).collect();

    let topic_index: HashMap<FormId, usize> =
        topics.iter().enumerate().map(|(i, t)| (t.form_id, i)).collect();

    let mut by_topic: HashMap<Option<FormId>, Vec<Dialogue>> = HashMap::new();
    for dialogue in dialogues {
        by_topic.entry(dialogue.topic_form_id).or_default().push(dialogue);
    }

    let mut nodes: Vec<TopicDialogueNode> = topics
        .into_iter()
        .map(|topic| TopicDialogueNode {
            topic_form_id: Some(topic.form_id),
            editor_id: topic.editor_id.map(|e| e.as_str().to_string()),
            full_name: topic.full_name,
            quest_form_id: None, // filled below, from the topic's own infos
            priority: 0,
            is_unlinked_bucket: false,
            infos: Vec::new(),
        })
        .collect();

    // Re-derive quest_form_id per node: topic.quest_form_id isn't tracked on
    // Topic itself (DIAL carries no QSTI), so fall back to the first
    // non-zero quest_form_id among the topic's own infos.
    let mut orphan_topics = Vec::new();
    let mut quest_groups: HashMap<FormId, Vec<TopicDialogueNode>> = HashMap::new();
    let mut unlinked_by_quest: HashMap<Option<FormId>, Vec<InfoDialogueNode>> = HashMap::new();

    for (form_id, idx) in &topic_index {
        let mut infos: Vec<Dialogue> = by_topic.remove(&Some(*form_id)).unwrap_or_default();
        infos.sort_by_key(|d| d.info_index.unwrap_or(i32::MAX));

        let quest_form_id = infos.iter().find_map(|d| d.quest_form_id.filter(|f| !f.is_null()));

        let node = &mut nodes[*idx];
        node.quest_form_id = quest_form_id;
        node.priority = quest_form_id.and_then(|q| quest_priority.get(&q).copied()).unwrap_or(0);
        node.infos = infos
            .into_iter()
            .map(|dialogue| {
                let linked_topics = dialogue
                    .link_to_topics
                    .iter()
                    .chain(dialogue.add_topics.iter())
                    .filter(|fid| topic_index.contains_key(*fid))
                    .copied()
                    .collect();
                InfoDialogueNode { dialogue, linked_topics }
            })
            .collect();
    }

    for node in nodes {
        match node.quest_form_id {
            Some(quest_form_id) => quest_groups.entry(quest_form_id).or_default().push(node),
            None => orphan_topics.push(node),
        }
    }

    // Unlinked INFOs: whatever's left in `by_topic` under `None` (or under a
    // topic FormID no longer present), grouped by their own quest_form_id.
    for (_, infos) in by_topic {
        for dialogue in infos {
            let quest_form_id = dialogue.quest_form_id;
            let linked_topics = dialogue
                .link_to_topics
                .iter()
                .chain(dialogue.add_topics.iter())
                .filter(|fid| topic_index.contains_key(fid))
                .copied()
                .collect();
            unlinked_by_quest
                .entry(quest_form_id)
                .or_default()
                .push(InfoDialogueNode { dialogue, linked_topics });
        }
    }

    for (quest_form_id, infos) in unlinked_by_quest {
        let bucket = TopicDialogueNode {
            topic_form_id: None,
            editor_id: None,
            full_name: Some("(Unlinked Responses)".to_string()),
            quest_form_id,
            priority: quest_form_id.and_then(|q| quest_priority.get(&q).copied()).unwrap_or(0),
            is_unlinked_bucket: true,
            infos,
        };
        match quest_form_id {
            Some(q) => quest_groups.entry(q).or_default().push(bucket),
            None => orphan_topics.push(bucket),
        }
    }

    let mut quest_list: Vec<QuestDialogueGroup> = quest_groups
        .into_iter()
        .map(|(quest_form_id, mut group_topics)| {
            group_topics.sort_by(|a, b| {
                b.priority.cmp(&a.priority).then_with(|| {
                    let name_a = a.full_name.clone().unwrap_or_default().to_lowercase();
                    let name_b = b.full_name.clone().unwrap_or_default().to_lowercase();
                    name_a.cmp(&name_b)
                })
            });
            QuestDialogueGroup { quest_form_id, topics: group_topics }
        })
        .collect();
    quest_list.sort_by_key(|g| g.quest_form_id.0);

    DialogueTree { quests: quest_list, orphan_topics }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{Logger, QuestInfoEntry, QuestInfoList, RuntimeReader};
    use crate::config::ReconstructionConfig;
    use crate::correlation::CorrelationMap;
    use crate::records::qust::Quest as Q;
    use crate::scan_result::ScanResult;
    use crate::types::EditorId;

    struct NullLogger;
    impl Logger for NullLogger {
        fn debug(&self, _m: &str) {}
    }

    struct FakeRuntime;
    impl RuntimeReader for FakeRuntime {
        fn walk_topic_quest_info_list(&self, dial_form_id: FormId) -> Vec<QuestInfoList> {
            if dial_form_id == FormId(0x0100DD00) {
                vec![QuestInfoList {
                    quest_form_id: FormId(0x0500_0010),
                    infos: vec![QuestInfoEntry { form_id: FormId(0x0100EE01), virtual_address: 0xAAAA }],
                }]
            } else {
                Vec::new()
            }
        }

        fn read_runtime_dialogue_info(&self, virtual_address: u64) -> Option<crate::capabilities::RuntimeDialogueInfo> {
            if virtual_address == 0xAAAA {
                Some(crate::capabilities::RuntimeDialogueInfo { offset: 0x1234, ..Default::default() })
            } else {
                None
            }
        }
    }

    fn topic(form_id: FormId, speaker: Option<FormId>) -> Topic {
        Topic { form_id, editor_id: None, full_name: None, offset: 0, is_big_endian: false, speaker_form_id: speaker }
    }

    fn dialogue(form_id: FormId, topic_form_id: Option<FormId>, speaker: Option<FormId>) -> Dialogue {
        Dialogue {
            form_id,
            editor_id: None,
            offset: 0,
            is_big_endian: false,
            quest_form_id: None,
            topic_form_id,
            previous_info_form_id: None,
            speaker_form_id: speaker,
            link_to_topics: Vec::new(),
            link_from_topics: Vec::new(),
            add_topics: Vec::new(),
            difficulty: 0,
            responses: Vec::new(),
            info_index: None,
            prompt_text: None,
            info_flags: None,
        }
    }

    #[test]
    fn s3_topic_walk_creates_new_info() {
        let scan = ScanResult::default();
        let correlation = CorrelationMap::build(&scan);
        let config = ReconstructionConfig::default();
        let logger = NullLogger;
        let runtime = FakeRuntime;
        let ctx = ReconstructionContext {
            scan: &scan,
            correlation: &correlation,
            accessor: None,
            runtime: Some(&runtime),
            logger: &logger,
            config: &config,
        };

        let topics = vec![topic(FormId(0x0100DD00), None)];
        let tree = build(&ctx, Vec::new(), topics, &[]);

        let all_infos: Vec<_> = tree
            .quests
            .iter()
            .flat_map(|g| g.topics.iter())
            .chain(tree.orphan_topics.iter())
            .flat_map(|t| t.infos.iter())
            .collect();
        let created = all_infos.iter().find(|n| n.dialogue.form_id == FormId(0x0100EE01));
        assert!(created.is_some());
        let created = created.unwrap();
        assert_eq!(created.dialogue.topic_form_id, Some(FormId(0x0100DD00)));
        assert_eq!(created.dialogue.quest_form_id, Some(FormId(0x0500_0010)));
        assert!(created.dialogue.is_big_endian);
    }

    #[test]
    fn s4_topic_speaker_propagates_to_unspoken_infos() {
        let t = topic(FormId(1), Some(FormId(0x0200AA00)));
        let mut dialogues = vec![
            dialogue(FormId(10), Some(FormId(1)), None),
            dialogue(FormId(11), Some(FormId(1)), Some(FormId(0x0200AA00))),
            dialogue(FormId(12), Some(FormId(1)), None),
        ];
        propagate_topic_speaker(std::slice::from_ref(&t), &mut dialogues);
        assert!(dialogues.iter().all(|d| d.speaker_form_id == Some(FormId(0x0200AA00))));
    }

    #[test]
    fn editor_id_fallback_links_to_longest_matching_quest_prefix() {
        let quests = vec![
            Q {
                form_id: FormId(1),
                editor_id: EditorId::new("MQ".to_string()),
                full_name: None,
                offset: 0,
                is_big_endian: false,
                flags: None,
                priority: None,
                script_form_id: None,
                stages: Vec::new(),
                objectives: Vec::new(),
            },
            Q {
                form_id: FormId(2),
                editor_id: EditorId::new("MQ01".to_string()),
                full_name: None,
                offset: 0,
                is_big_endian: false,
                flags: None,
                priority: None,
                script_form_id: None,
                stages: Vec::new(),
                objectives: Vec::new(),
            },
        ];
        let mut dialogues = vec![dialogue(FormId(99), None, None)];
        dialogues[0].editor_id = EditorId::new("MQ01GreetingTopic".to_string());
        apply_editor_id_convention_fallback(&quests, &mut dialogues);
        assert_eq!(dialogues[0].quest_form_id, Some(FormId(2)));
    }
}
