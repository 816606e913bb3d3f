//! Derived path operations. Computed on demand, never cached on the path.

use odata_edm::{EdmType, NavigationSource};

use super::{KeyDelimiter, ODataPath};
use crate::render::NodeToStringBuilder;
use crate::segment::{
    BatchReferenceSegment, EntitySetSegment, KeySegment, NavigationPropertyLinkSegment,
    NavigationPropertySegment, NavigationSourceTranslator, OpenPropertySegment,
    OperationImportSegment, OperationSegment, OperationSegmentParameter, PathSegment,
    PathSegmentTranslator, PropertySegment, SingletonSegment, TypeSegment, ValueSegment,
};

impl ODataPath {
    /// Type addressed by the whole path.
    pub fn edm_type(&self) -> Option<EdmType> {
        self.last_segment()?.target_type()
    }

    /// Navigation source addressed by the whole path.
    pub fn navigation_source(&self) -> Option<NavigationSource> {
        self.last_segment()?
            .translate_with(&mut NavigationSourceTranslator)
    }

    pub fn is_collection(&self) -> bool {
        self.last_segment()
            .is_some_and(|segment| !segment.is_single_result())
    }

    /// Whether the path ends at a structural or dynamic property, ignoring a
    /// trailing type cast.
    pub fn is_individual_property(&self) -> bool {
        matches!(
            self.trim_ending_type_segment().last_segment(),
            Some(PathSegment::Property(_) | PathSegment::OpenProperty(_))
        )
    }

    /// Append a key, keeping a trailing type cast after it:
    /// `People/NS.Employee` becomes `People('1')/NS.Employee`.
    pub fn add_key_segment(&self, key: KeySegment) -> ODataPath {
        let mut segments = self.segments().to_vec();
        let cast = match segments.last() {
            Some(PathSegment::Type(_)) => segments.pop(),
            _ => None,
        };
        segments.push(PathSegment::Key(key));
        segments.extend(cast);
        ODataPath::new(segments)
    }

    /// Drop a trailing key, looking through a trailing type cast.
    pub fn trim_end_key_segment(&self) -> ODataPath {
        let mut segments = self.segments().to_vec();
        let cast = match segments.last() {
            Some(PathSegment::Type(_)) => segments.pop(),
            _ => None,
        };
        if matches!(segments.last(), Some(PathSegment::Key(_))) {
            segments.pop();
        }
        segments.extend(cast);
        ODataPath::new(segments)
    }

    pub fn trim_ending_type_segment(&self) -> ODataPath {
        let mut segments = self.segments().to_vec();
        if matches!(segments.last(), Some(PathSegment::Type(_))) {
            segments.pop();
        }
        ODataPath::new(segments)
    }

    /// Slash-delimited resource path: `People('1')/Friends/$count`.
    pub fn to_resource_path_string(&self, delimiter: KeyDelimiter) -> String {
        let mut translator = ResourcePathTranslator::new(delimiter);
        let mut out = String::new();
        for part in self.walk_with(&mut translator) {
            out.push_str(&part);
        }
        out.trim_start_matches('/').to_owned()
    }
}

/// Renders each segment as the text it appends to a resource path,
/// leading `/` included.
pub struct ResourcePathTranslator {
    delimiter: KeyDelimiter,
}

impl ResourcePathTranslator {
    pub fn new(delimiter: KeyDelimiter) -> Self {
        Self { delimiter }
    }
}

fn operation_text(
    name: &str,
    is_function: bool,
    parameters: &[OperationSegmentParameter],
) -> String {
    if !is_function {
        return format!("/{name}");
    }
    let mut builder = NodeToStringBuilder::new();
    let args: Vec<String> = parameters
        .iter()
        .map(|p| format!("{}={}", p.name, builder.translate(&p.value)))
        .collect();
    format!("/{name}({})", args.join(","))
}

impl PathSegmentTranslator<String> for ResourcePathTranslator {
    fn translate_entity_set(&mut self, segment: &EntitySetSegment) -> String {
        format!("/{}", segment.entity_set().name())
    }

    fn translate_singleton(&mut self, segment: &SingletonSegment) -> String {
        format!("/{}", segment.singleton().name())
    }

    fn translate_key(&mut self, segment: &KeySegment) -> String {
        segment.render(self.delimiter)
    }

    fn translate_navigation_property(&mut self, segment: &NavigationPropertySegment) -> String {
        format!("/{}", segment.property().name())
    }

    fn translate_navigation_property_link(
        &mut self,
        segment: &NavigationPropertyLinkSegment,
    ) -> String {
        format!("/{}/$ref", segment.property().name())
    }

    fn translate_type(&mut self, segment: &TypeSegment) -> String {
        format!("/{}", segment.target_type().element_type().full_name())
    }

    fn translate_property(&mut self, segment: &PropertySegment) -> String {
        format!("/{}", segment.property().name())
    }

    fn translate_open_property(&mut self, segment: &OpenPropertySegment) -> String {
        format!("/{}", segment.name())
    }

    fn translate_operation(&mut self, segment: &OperationSegment) -> String {
        operation_text(&segment.name(), segment.is_function(), segment.parameters())
    }

    fn translate_operation_import(&mut self, segment: &OperationImportSegment) -> String {
        operation_text(segment.name(), segment.is_function(), segment.parameters())
    }

    fn translate_count(&mut self) -> String {
        "/$count".to_owned()
    }

    fn translate_value(&mut self, _segment: &ValueSegment) -> String {
        "/$value".to_owned()
    }

    fn translate_batch(&mut self) -> String {
        "/$batch".to_owned()
    }

    fn translate_batch_reference(&mut self, segment: &BatchReferenceSegment) -> String {
        format!("/{}", segment.content_id())
    }

    fn translate_metadata(&mut self) -> String {
        "/$metadata".to_owned()
    }
}
