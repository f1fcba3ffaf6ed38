//! End-to-end tests for the completion engine
//!
//! Every request goes through classification, tag navigation and the
//! provider. The provider is an in-memory fake so the scenarios do not depend
//! on a HiveAPIQuery installation.

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::super::{
        CompletionContext, CompletionDataProvider, CompletionEngine, CompletionHandler,
        CompletionPair, CompletionResponse, EngineSettings, HiveDataProvider, ParamInfo,
        ParamValue,
    };
    use crate::buffer::{Buffer, BufferEditor, TextBuffer};
    use crate::error::QueryError;
    use crate::query::ProcessQuery;
    use crate::schema::SchemaRegistry;

    const OBJECT_TYPES: [&str; 3] = ["Sensor::Radar", "Sensor::Sonar", "Platform"];

    /// Records every call; optionally fails them all
    #[derive(Default)]
    struct FakeProvider {
        calls: Mutex<Vec<String>>,
        fail: bool,
    }

    impl FakeProvider {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn record(&self, call: String) -> Result<(), QueryError> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                return Err(QueryError::NotFound("HiveAPIQuery".to_string()));
            }
            Ok(())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CompletionDataProvider for FakeProvider {
        fn object_types(&self, prefix: &str) -> Result<Vec<CompletionPair>, QueryError> {
            self.record(format!("object_types({prefix})"))?;
            Ok(OBJECT_TYPES
                .iter()
                .filter(|t| t.starts_with(prefix))
                .map(|t| CompletionPair::word(t.replacen(prefix, "", 1)))
                .collect())
        }

        fn param_names(&self, object_type: &str) -> Result<Vec<ParamInfo>, QueryError> {
            self.record(format!("param_names({object_type})"))?;
            Ok(vec![
                ParamInfo {
                    name: "range".to_string(),
                    description: "Detection range".to_string(),
                },
                ParamInfo {
                    name: "mode".to_string(),
                    description: "Operating mode".to_string(),
                },
            ])
        }

        fn param_values(
            &self,
            param_name: &str,
            object_type: &str,
            prefix: &str,
        ) -> Result<Vec<ParamValue>, QueryError> {
            self.record(format!("param_values({param_name}, {object_type}, {prefix})"))?;
            Ok(vec![
                ParamValue {
                    value: "track".to_string(),
                    description: "Tracking".to_string(),
                    is_default: true,
                    insert: "track".to_string(),
                },
                ParamValue {
                    value: "scan".to_string(),
                    description: "Scanning".to_string(),
                    is_default: false,
                    insert: "scan".to_string(),
                },
            ])
        }

        fn element_children(&self, element: &str) -> Result<Vec<String>, QueryError> {
            self.record(format!("element_children({element})"))?;
            Ok(SchemaRegistry::hive().children(element).to_vec())
        }

        fn element_attributes(&self, element: &str) -> Result<Vec<String>, QueryError> {
            self.record(format!("element_attributes({element})"))?;
            Ok(SchemaRegistry::hive().attributes(element).to_vec())
        }
    }

    fn create_test_engine() -> (CompletionEngine, Arc<FakeProvider>) {
        let fake = Arc::new(FakeProvider::default());
        let engine = CompletionEngine::new(fake.clone(), EngineSettings::default());
        (engine, fake)
    }

    /// Complete with the cursor at the end of `text`
    fn complete_at_end(
        engine: &CompletionEngine,
        text: &str,
        prefix: &str,
    ) -> (TextBuffer, CompletionResponse) {
        let mut buffer = TextBuffer::new(text);
        let location = buffer.len();
        let response = engine.complete(&mut buffer, location, prefix);
        (buffer, response)
    }

    fn labels(response: &CompletionResponse) -> Vec<&str> {
        response.items.iter().map(|p| p.label.as_str()).collect()
    }

    fn inserts(response: &CompletionResponse) -> Vec<&str> {
        response.items.iter().map(|p| p.insert.as_str()).collect()
    }

    #[test]
    fn test_object_type_completion() {
        let (engine, fake) = create_test_engine();
        let (_, response) = complete_at_end(&engine, "<hive>\n  <object type=\"", "");

        assert_eq!(response.context, CompletionContext::ObjectType);
        assert_eq!(labels(&response), vec!["Platform", "Sensor::Radar", "Sensor::Sonar"]);
        assert_eq!(inserts(&response), vec!["Platform", "Sensor::Radar", "Sensor::Sonar"]);
        assert!(response.inhibit_host_completions);
        assert_eq!(fake.calls(), vec!["object_types()"]);
    }

    #[test]
    fn test_object_type_without_quotes_quotes_insertions() {
        let (engine, _) = create_test_engine();
        let (buffer, response) = complete_at_end(&engine, "<hive>\n  <object type=", "");

        assert_eq!(response.context, CompletionContext::ObjectTypeNoQuotes);
        assert_eq!(inserts(&response)[0], "\"Platform\"");
        assert_eq!(buffer.text(), "<hive>\n  <object type=");
    }

    #[test]
    fn test_param_name_uses_parent_object_type() {
        let (engine, fake) = create_test_engine();
        let text = "<hive>\n<object type=\"Sensor::Radar\">\n  <param name=\"";
        let (_, response) = complete_at_end(&engine, text, "");

        assert_eq!(response.context, CompletionContext::ParamName);
        assert_eq!(
            response.items,
            vec![
                CompletionPair::new("mode\tOperating mode", "mode"),
                CompletionPair::new("range\tDetection range", "range"),
            ]
        );
        assert_eq!(fake.calls(), vec!["param_names(Sensor::Radar)"]);
    }

    #[test]
    fn test_param_name_under_empty_object_type() {
        let (engine, fake) = create_test_engine();
        let text = "<hive>\n<object type=\"\">\n  <param name=\"";
        let (_, response) = complete_at_end(&engine, text, "");

        assert_eq!(response.context, CompletionContext::ParamName);
        assert_eq!(fake.calls(), vec!["param_names()"]);
    }

    #[test]
    fn test_param_value_lookup_after_sibling_objects() {
        let (engine, fake) = create_test_engine();
        let text = "<hive>\n<object type=\"Platform\">\n</object>\n\
                    <object type=\"Sensor::Sonar\">\n  <param name=\"mode\" value=\"";
        let (_, response) = complete_at_end(&engine, text, "");

        assert_eq!(response.context, CompletionContext::ParamValue);
        assert_eq!(fake.calls(), vec!["param_values(mode, Sensor::Sonar, )"]);
    }

    #[test]
    fn test_param_name_without_quotes() {
        let (engine, _) = create_test_engine();
        let text = "<hive>\n<object type=\"Sensor::Radar\">\n  <param name=";
        let (_, response) = complete_at_end(&engine, text, "");

        assert_eq!(response.context, CompletionContext::ParamNameNoQuotes);
        assert_eq!(inserts(&response), vec!["\"mode\"", "\"range\""]);
    }

    #[test]
    fn test_param_name_in_closed_document() {
        let (engine, fake) = create_test_engine();
        let text = "<hive>\n<object type=\"Sensor::Radar\">\n  <param name=\"\"/>\n</object>\n</hive>";
        let mut buffer = TextBuffer::new(text);
        let location = text.find("name=\"").unwrap() + 6;
        let response = engine.complete(&mut buffer, location, "");

        assert_eq!(response.context, CompletionContext::ParamName);
        assert_eq!(fake.calls(), vec!["param_names(Sensor::Radar)"]);
    }

    #[test]
    fn test_element_completion_under_object() {
        let (engine, fake) = create_test_engine();
        let text = "<hive>\n<object type=\"A\">\n  <param name=\"x\" value=\"1\"/>\n  <";
        let (_, response) = complete_at_end(&engine, text, "");

        assert_eq!(response.context, CompletionContext::Element);
        assert_eq!(response.items.first(), Some(&CompletionPair::word("confidential")));
        assert!(labels(&response).contains(&"param"));
        assert_eq!(fake.calls(), vec!["element_children(object)"]);
    }

    #[test]
    fn test_element_completion_at_root() {
        let (engine, _) = create_test_engine();
        let (_, response) = complete_at_end(&engine, "<", "");
        assert_eq!(labels(&response), vec!["hive"]);

        let (_, response) = complete_at_end(&engine, "<?xml version=\"1.0\"?>\n<!-- <object> -->\n<", "");
        assert_eq!(labels(&response), vec!["hive"]);
    }

    #[test]
    fn test_element_completion_after_closed_sibling() {
        let (engine, fake) = create_test_engine();
        let text = "<hive>\n<object type=\"A\">\n</object>\n<";
        let (_, response) = complete_at_end(&engine, text, "");

        assert!(labels(&response).contains(&"object"));
        assert_eq!(fake.calls(), vec!["element_children(hive)"]);
    }

    #[test]
    fn test_attribute_completion() {
        let (engine, fake) = create_test_engine();
        let (_, response) = complete_at_end(&engine, "<hive>\n<param ", "");

        assert_eq!(response.context, CompletionContext::Attribute);
        assert_eq!(labels(&response), vec!["name", "value"]);
        assert_eq!(fake.calls(), vec!["element_attributes(param)"]);
    }

    #[test]
    fn test_param_value_completion() {
        let (engine, fake) = create_test_engine();
        let text = "<hive>\n<object type=\"Sensor::Radar\">\n<param name=\"mode\" value=\"";
        let (_, response) = complete_at_end(&engine, text, "");

        assert_eq!(response.context, CompletionContext::ParamValue);
        assert_eq!(labels(&response), vec!["scan\tScanning", "track\t*Tracking"]);
        assert_eq!(inserts(&response), vec!["scan", "track"]);
        assert_eq!(fake.calls(), vec!["param_values(mode, Sensor::Radar, )"]);
    }

    #[test]
    fn test_param_value_without_quotes_edits_buffer() {
        let (engine, fake) = create_test_engine();
        let text = "<hive>\n<object type=\"Sensor::Radar\">\n<param name=\"mode\" value=sc";
        let (buffer, response) = complete_at_end(&engine, text, "sc");

        assert_eq!(response.context, CompletionContext::ParamValueNoQuotes);
        assert!(buffer.text().ends_with("value=\"sc\""));
        assert_eq!(buffer.cursor(), text.chars().count() + 1);
        assert_eq!(buffer.char_at(buffer.cursor()), Some('"'));
        // The quotes are in the buffer, so the candidates carry none
        assert_eq!(inserts(&response), vec!["scan", "track"]);
        assert_eq!(fake.calls(), vec!["param_values(mode, Sensor::Radar, )"]);
    }

    #[test]
    fn test_attribute_value_has_no_candidates() {
        let (engine, fake) = create_test_engine();
        let (_, response) = complete_at_end(&engine, "<hive>\n<object id=\"", "");

        assert_eq!(response.context, CompletionContext::AttributeValue);
        assert!(response.items.is_empty());
        assert!(!response.inhibit_host_completions);
        assert!(fake.calls().is_empty());
    }

    #[test]
    fn test_colon_prefix_completes_namespace() {
        let (engine, fake) = create_test_engine();
        let (buffer, response) = complete_at_end(&engine, "<hive>\n<object type=\"Sensor::Ra", "Ra");

        assert_eq!(response.context, CompletionContext::ObjectTypeColon);
        assert_eq!(labels(&response), vec!["Radar", "Sonar"]);
        assert_eq!(fake.calls(), vec!["object_types(Sensor::)"]);
        assert_eq!(buffer.text(), "<hive>\n<object type=\"Sensor::Ra");
    }

    #[test]
    fn test_single_colon_does_not_query() {
        let (engine, fake) = create_test_engine();
        let (_, response) = complete_at_end(&engine, "<hive>\n<object type=\"Sensor:Ra", "Ra");

        assert_eq!(response.context, CompletionContext::ObjectTypeColon);
        assert!(response.items.is_empty());
        assert!(fake.calls().is_empty());
    }

    #[test]
    fn test_colon_prefix_without_quotes_edits_buffer() {
        let (engine, _) = create_test_engine();
        let text = "<hive>\n<object type=Sensor::Ra";
        let (buffer, response) = complete_at_end(&engine, text, "Ra");

        assert_eq!(response.context, CompletionContext::ObjectTypeColonNoQuotes);
        assert_eq!(buffer.text(), "<hive>\n<object type=\"Sensor::Ra\"");
        assert_eq!(buffer.cursor(), text.chars().count() + 1);
        assert_eq!(inserts(&response), vec!["Radar", "Sonar"]);
    }

    #[test]
    fn test_outside_tag_has_no_candidates() {
        let (engine, fake) = create_test_engine();
        let (_, response) = complete_at_end(&engine, "<hive>\n  text", "text");

        assert_eq!(response.context, CompletionContext::None);
        assert!(response.items.is_empty());
        assert!(fake.calls().is_empty());
    }

    #[test]
    fn test_plain_text_buffer_is_ignored() {
        let (engine, fake) = create_test_engine();
        let mut buffer = TextBuffer::plain("<object type=\"");
        let location = buffer.len();
        let response = engine.complete(&mut buffer, location, "");

        assert_eq!(response.context, CompletionContext::None);
        assert!(response.items.is_empty());
        assert!(fake.calls().is_empty());
    }

    #[test]
    fn test_provider_failure_yields_empty_list() {
        let fake = Arc::new(FakeProvider::failing());
        let engine = CompletionEngine::new(fake.clone(), EngineSettings::default());

        for text in [
            "<hive>\n<object type=\"",
            "<hive>\n<object type=\"Sensor::",
            "<hive>\n<object type=\"A\">\n<param name=\"",
            "<hive>\n<object type=\"A\">\n<param name=\"x\" value=",
            "<hive>\n<",
            "<hive>\n<object ",
        ] {
            let (_, response) = complete_at_end(&engine, text, "");
            assert!(response.items.is_empty(), "expected no items for {text:?}");
            assert!(!response.inhibit_host_completions);
        }
        assert_eq!(fake.calls().len(), 6);
    }

    #[test]
    fn test_missing_query_binary_yields_empty_list() {
        let provider = HiveDataProvider::new(
            SchemaRegistry::hive(),
            Box::new(ProcessQuery::new("/nonexistent/dir/HiveAPIQuery")),
        );
        let engine = CompletionEngine::new(Arc::new(provider), EngineSettings::default());

        let (_, response) = complete_at_end(&engine, "<hive>\n<object type=\"", "");
        assert_eq!(response.context, CompletionContext::ObjectType);
        assert!(response.items.is_empty());

        // Schema lookups still work without the binary
        let (_, response) = complete_at_end(&engine, "<hive>\n<", "");
        assert!(!response.items.is_empty());
    }

    #[test]
    fn test_inhibit_setting_respected() {
        let fake = Arc::new(FakeProvider::default());
        let engine = CompletionEngine::new(
            fake,
            EngineSettings {
                inhibit_other_completions: false,
            },
        );
        let (_, response) = complete_at_end(&engine, "<", "");
        assert!(!response.items.is_empty());
        assert!(!response.inhibit_host_completions);
    }

    #[test]
    fn test_handler_accepts_trait_object_buffer() {
        let (engine, _) = create_test_engine();
        let handler: &dyn CompletionHandler = &engine;

        let mut buffer = TextBuffer::new("<hive>\n<object type=");
        let location = buffer.len();
        let editor: &mut dyn BufferEditor = &mut buffer;
        let response = handler.on_query_completions(editor, location, "");

        assert_eq!(response.context, CompletionContext::ObjectTypeNoQuotes);
        assert_eq!(response.items.len(), 3);
    }
}
