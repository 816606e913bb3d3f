//! Double dispatch over path segments.
//!
//! [`PathSegmentTranslator`] produces a value per segment; [`PathSegmentHandler`]
//! is its side-effect-only counterpart. Neither has default methods.

use odata_edm::NavigationSource;

use super::segments::{
    BatchReferenceSegment, EntitySetSegment, KeySegment, NavigationPropertyLinkSegment,
    NavigationPropertySegment, OpenPropertySegment, OperationImportSegment, OperationSegment,
    PropertySegment, SingletonSegment, TypeSegment, ValueSegment,
};

pub trait PathSegmentTranslator<T> {
    fn translate_entity_set(&mut self, segment: &EntitySetSegment) -> T;
    fn translate_singleton(&mut self, segment: &SingletonSegment) -> T;
    fn translate_key(&mut self, segment: &KeySegment) -> T;
    fn translate_navigation_property(&mut self, segment: &NavigationPropertySegment) -> T;
    fn translate_navigation_property_link(&mut self, segment: &NavigationPropertyLinkSegment)
    -> T;
    fn translate_type(&mut self, segment: &TypeSegment) -> T;
    fn translate_property(&mut self, segment: &PropertySegment) -> T;
    fn translate_open_property(&mut self, segment: &OpenPropertySegment) -> T;
    fn translate_operation(&mut self, segment: &OperationSegment) -> T;
    fn translate_operation_import(&mut self, segment: &OperationImportSegment) -> T;
    fn translate_count(&mut self) -> T;
    fn translate_value(&mut self, segment: &ValueSegment) -> T;
    fn translate_batch(&mut self) -> T;
    fn translate_batch_reference(&mut self, segment: &BatchReferenceSegment) -> T;
    fn translate_metadata(&mut self) -> T;
}

pub trait PathSegmentHandler {
    fn handle_entity_set(&mut self, segment: &EntitySetSegment);
    fn handle_singleton(&mut self, segment: &SingletonSegment);
    fn handle_key(&mut self, segment: &KeySegment);
    fn handle_navigation_property(&mut self, segment: &NavigationPropertySegment);
    fn handle_navigation_property_link(&mut self, segment: &NavigationPropertyLinkSegment);
    fn handle_type(&mut self, segment: &TypeSegment);
    fn handle_property(&mut self, segment: &PropertySegment);
    fn handle_open_property(&mut self, segment: &OpenPropertySegment);
    fn handle_operation(&mut self, segment: &OperationSegment);
    fn handle_operation_import(&mut self, segment: &OperationImportSegment);
    fn handle_count(&mut self);
    fn handle_value(&mut self, segment: &ValueSegment);
    fn handle_batch(&mut self);
    fn handle_batch_reference(&mut self, segment: &BatchReferenceSegment);
    fn handle_metadata(&mut self);
}

/// Navigation source carried by each segment kind. Properties, system
/// segments, and `$value` carry none.
pub struct NavigationSourceTranslator;

impl PathSegmentTranslator<Option<NavigationSource>> for NavigationSourceTranslator {
    fn translate_entity_set(&mut self, segment: &EntitySetSegment) -> Option<NavigationSource> {
        Some(NavigationSource::EntitySet(segment.entity_set().clone()))
    }

    fn translate_singleton(&mut self, segment: &SingletonSegment) -> Option<NavigationSource> {
        Some(NavigationSource::Singleton(segment.singleton().clone()))
    }

    fn translate_key(&mut self, segment: &KeySegment) -> Option<NavigationSource> {
        segment.navigation_source().cloned()
    }

    fn translate_navigation_property(
        &mut self,
        segment: &NavigationPropertySegment,
    ) -> Option<NavigationSource> {
        segment.navigation_source().cloned()
    }

    fn translate_navigation_property_link(
        &mut self,
        segment: &NavigationPropertyLinkSegment,
    ) -> Option<NavigationSource> {
        segment.navigation_source().cloned()
    }

    fn translate_type(&mut self, segment: &TypeSegment) -> Option<NavigationSource> {
        segment.navigation_source().cloned()
    }

    fn translate_property(&mut self, _segment: &PropertySegment) -> Option<NavigationSource> {
        None
    }

    fn translate_open_property(
        &mut self,
        _segment: &OpenPropertySegment,
    ) -> Option<NavigationSource> {
        None
    }

    fn translate_operation(&mut self, segment: &OperationSegment) -> Option<NavigationSource> {
        segment.entity_set().cloned().map(NavigationSource::EntitySet)
    }

    fn translate_operation_import(
        &mut self,
        segment: &OperationImportSegment,
    ) -> Option<NavigationSource> {
        segment.entity_set().cloned().map(NavigationSource::EntitySet)
    }

    fn translate_count(&mut self) -> Option<NavigationSource> {
        None
    }

    fn translate_value(&mut self, _segment: &ValueSegment) -> Option<NavigationSource> {
        None
    }

    fn translate_batch(&mut self) -> Option<NavigationSource> {
        None
    }

    fn translate_batch_reference(
        &mut self,
        segment: &BatchReferenceSegment,
    ) -> Option<NavigationSource> {
        segment.entity_set().cloned().map(NavigationSource::EntitySet)
    }

    fn translate_metadata(&mut self) -> Option<NavigationSource> {
        None
    }
}
