//! # Node Classification
//!
//! Turns labeled node records into typed output nodes and tells the caller
//! which natural name the node's identity must be registered under.
//!
//! Label precedence (first match wins):
//!
//! | Label | Node type | Identity |
//! |-------|-----------|----------|
//! | `Metabolite` | `metabolite` | first `chebi:` link, else `pss:{name}` |
//! | `Complex` | `complex` | `pss:{name}` |
//! | `ForeignEntity` | value of `classification` | first `ncbitaxon:` link, else `pss:{name}` |
//! | `ForeignAbiotic` | `environmental_process` | `pss:{name}` |
//! | `ForeignCoding` | `foreign_gene` | `pss:{name}` |
//! | `Family` | `gene_family` | `pss:{name}` |
//! | `Process` | `biological_process` | `pss:{name}` |
//! | `FunctionalCluster` | `functional_cluster` | `skm:{functional_cluster_id}` |

use crate::annotations::GeneAnnotations;
use crate::diagnostics::Diagnostics;
use crate::primitives::{
    CHEBI_LINK, FUNCTIONAL_CLUSTER_MEMBER, FUNCTIONAL_CLUSTER_URL, GENE_SEARCH_URL,
    NCBITAXON_LINK, PSS_PREFIX, SKM_PREFIX, TAIR_PREFIX, first_link,
};
use crate::{Identity, OutputEdge, OutputNode, PropertyMap, PropertyValue, PssError, RawNode};

/// Node property listing a cluster's Arabidopsis homologues.
pub const HOMOLOGUES_PROPERTY: &str = "ath_homologues";

/// Classification rule selected by a node's labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    Metabolite,
    Complex,
    ForeignEntity,
    ForeignAbiotic,
    ForeignCoding,
    Family,
    Process,
    FunctionalCluster,
}

impl NodeKind {
    /// Kinds in label precedence order.
    pub const PRECEDENCE: [Self; 8] = [
        Self::Metabolite,
        Self::Complex,
        Self::ForeignEntity,
        Self::ForeignAbiotic,
        Self::ForeignCoding,
        Self::Family,
        Self::Process,
        Self::FunctionalCluster,
    ];

    /// The graph label selecting this kind.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Metabolite => "Metabolite",
            Self::Complex => "Complex",
            Self::ForeignEntity => "ForeignEntity",
            Self::ForeignAbiotic => "ForeignAbiotic",
            Self::ForeignCoding => "ForeignCoding",
            Self::Family => "Family",
            Self::Process => "Process",
            Self::FunctionalCluster => "FunctionalCluster",
        }
    }

    /// Pick the first kind whose label the node carries.
    #[must_use]
    pub fn from_node(node: &RawNode) -> Option<Self> {
        Self::PRECEDENCE.into_iter().find(|k| node.has_label(k.label()))
    }

    /// Output type for kinds whose type does not depend on the record.
    fn fixed_type(&self) -> Option<&'static str> {
        match self {
            Self::Metabolite => Some("metabolite"),
            Self::Complex => Some("complex"),
            Self::ForeignEntity => None,
            Self::ForeignAbiotic => Some("environmental_process"),
            Self::ForeignCoding => Some("foreign_gene"),
            Self::Family => Some("gene_family"),
            Self::Process => Some("biological_process"),
            Self::FunctionalCluster => Some("functional_cluster"),
        }
    }

    /// Cross-reference key preferred over the `pss:` fallback.
    fn preferred_link(&self) -> Option<&'static str> {
        match self {
            Self::Metabolite => Some(CHEBI_LINK),
            Self::ForeignEntity => Some(NCBITAXON_LINK),
            _ => None,
        }
    }
}

/// A classified node together with the name its identity is registered under.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedNode {
    pub kind: NodeKind,
    pub name: String,
    pub node: OutputNode,
}

/// Classify one node record.
///
/// # Errors
/// - `PssError::UnclassifiableNode` if no label matches
/// - `PssError::MissingAttribute` / `InvalidAttribute` if a required property
///   (`name`, `classification`, `short_name`, `functional_cluster_id`) is absent
pub fn classify_node(record: &RawNode) -> Result<ClassifiedNode, PssError> {
    let kind = NodeKind::from_node(record).ok_or_else(|| PssError::UnclassifiableNode {
        labels: record.labels.clone(),
    })?;
    let name = record.require_str("name")?.to_string();
    let description = record.get_str("description").unwrap_or("");

    let node = match kind {
        NodeKind::FunctionalCluster => {
            let cluster_id = record.require_key("functional_cluster_id")?;
            let mut props = PropertyMap::new();
            props.insert(
                "name".to_string(),
                PropertyValue::from(record.require_str("short_name")?),
            );
            props.insert("description".to_string(), PropertyValue::from(description));
            let info: String = record
                .get_str("additional_information")
                .unwrap_or("")
                .chars()
                .filter(|c| *c != '"' && *c != '\'')
                .collect();
            props.insert("additional_information".to_string(), PropertyValue::from(info));
            props.insert(
                "url".to_string(),
                PropertyValue::Str(format!("{FUNCTIONAL_CLUSTER_URL}{cluster_id}")),
            );
            OutputNode::new(
                Identity::prefixed(SKM_PREFIX, &cluster_id),
                "functional_cluster",
                props,
            )
        }
        _ => {
            let node_type = match kind.fixed_type() {
                Some(t) => t.to_string(),
                None => record.require_str("classification")?.to_string(),
            };
            let identity = kind
                .preferred_link()
                .and_then(|key| first_link(record.str_list("external_links"), key))
                .map(Identity::new)
                .unwrap_or_else(|| Identity::prefixed(PSS_PREFIX, &name));

            let mut props = PropertyMap::new();
            props.insert("name".to_string(), PropertyValue::from(name.as_str()));
            props.insert("description".to_string(), PropertyValue::from(description));
            OutputNode::new(identity, node_type, props)
        }
    };

    Ok(ClassifiedNode { kind, name, node })
}

/// Expand a functional cluster's homologue list into gene nodes.
///
/// Returns the gene nodes and one `functional_cluster_member` edge per gene
/// (gene -> cluster). Genes without an annotation row are reported and skipped.
pub fn expand_cluster_genes(
    record: &RawNode,
    cluster: &Identity,
    annotations: &GeneAnnotations,
    diagnostics: &mut Diagnostics,
) -> (Vec<OutputNode>, Vec<OutputEdge>) {
    let homologues = record.str_list(HOMOLOGUES_PROPERTY);
    let mut genes = Vec::with_capacity(homologues.len());
    let mut edges = Vec::with_capacity(homologues.len());

    for ath in homologues {
        let Some(annotation) = annotations.get(ath) else {
            diagnostics.report(&PssError::MissingAnnotation {
                gene: ath.clone(),
                cluster: cluster.to_string(),
            });
            continue;
        };

        let mut props = annotation.clone();
        props.insert(
            "url".to_string(),
            PropertyValue::Str(format!("{GENE_SEARCH_URL}{ath}")),
        );
        props.insert("tair".to_string(), PropertyValue::from(ath.as_str()));

        let gene_id = Identity::prefixed(TAIR_PREFIX, ath);
        edges.push(OutputEdge::incidental(
            gene_id.clone(),
            cluster.clone(),
            FUNCTIONAL_CLUSTER_MEMBER,
        ));
        genes.push(OutputNode::new(gene_id, "gene", props));
    }

    (genes, edges)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn links(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn metabolite_prefers_chebi() {
        let record = RawNode::new(["Metabolite"])
            .with("name", "ABA")
            .with("external_links", links(&["pubchem:5280896", "chebi:2365"]));

        let classified = classify_node(&record).expect("classify");
        assert_eq!(classified.node.id.as_str(), "chebi:2365");
        assert_eq!(classified.node.node_type, "metabolite");
        assert_eq!(classified.name, "ABA");
        assert_eq!(classified.node.properties["description"], PropertyValue::from(""));
    }

    #[test]
    fn metabolite_falls_back_to_pss() {
        let record = RawNode::new(["Metabolite"]).with("name", "ROS");
        let classified = classify_node(&record).expect("classify");
        assert_eq!(classified.node.id.as_str(), "pss:ROS");
    }

    #[test]
    fn fixed_type_kinds() {
        let cases = [
            ("Complex", "complex"),
            ("ForeignAbiotic", "environmental_process"),
            ("ForeignCoding", "foreign_gene"),
            ("Family", "gene_family"),
            ("Process", "biological_process"),
        ];
        for (label, node_type) in cases {
            let record = RawNode::new([label])
                .with("name", "X")
                .with("description", "desc");
            let classified = classify_node(&record).expect("classify");
            assert_eq!(classified.node.node_type, node_type);
            assert_eq!(classified.node.id.as_str(), "pss:X");
            assert_eq!(classified.node.properties["description"], PropertyValue::from("desc"));
        }
    }

    #[test]
    fn foreign_entity_type_from_classification() {
        let record = RawNode::new(["ForeignEntity"])
            .with("name", "PVY")
            .with("classification", "virus")
            .with("external_links", links(&["ncbitaxon:12216"]));

        let classified = classify_node(&record).expect("classify");
        assert_eq!(classified.node.node_type, "virus");
        assert_eq!(classified.node.id.as_str(), "ncbitaxon:12216");
    }

    #[test]
    fn foreign_entity_without_classification_is_malformed() {
        let record = RawNode::new(["ForeignEntity"]).with("name", "PVY");
        assert!(matches!(
            classify_node(&record),
            Err(PssError::MissingAttribute { attribute, .. }) if attribute == "classification"
        ));
    }

    #[test]
    fn label_precedence() {
        let record = RawNode::new(["Process", "Metabolite"]).with("name", "X");
        assert_eq!(classify_node(&record).expect("classify").kind, NodeKind::Metabolite);
    }

    #[test]
    fn unknown_labels_are_unclassifiable() {
        let record = RawNode::new(["Reaction"]).with("name", "r1");
        assert!(matches!(
            classify_node(&record),
            Err(PssError::UnclassifiableNode { .. })
        ));
    }

    #[test]
    fn functional_cluster_node() {
        let record = RawNode::new(["FunctionalCluster"])
            .with("name", "FC-JAZ")
            .with("short_name", "JAZ")
            .with("functional_cluster_id", 17i64)
            .with("additional_information", "the \"JAZ\" 'repressors'");

        let classified = classify_node(&record).expect("classify");
        assert_eq!(classified.name, "FC-JAZ");
        assert_eq!(classified.node.id.as_str(), "skm:17");
        assert_eq!(classified.node.properties["name"], PropertyValue::from("JAZ"));
        assert_eq!(
            classified.node.properties["additional_information"],
            PropertyValue::from("the JAZ repressors")
        );
        assert_eq!(
            classified.node.properties["url"],
            PropertyValue::from("https://skm.nib.si/biomine/?functional_cluster_id=17")
        );
    }

    #[test]
    fn cluster_genes_expand_with_annotations() {
        let mut annotations = GeneAnnotations::new();
        let mut props = PropertyMap::new();
        props.insert("name".to_string(), PropertyValue::from("JAZ1"));
        annotations.insert("AT1G19180", props);

        let record = RawNode::new(["FunctionalCluster"]).with(
            HOMOLOGUES_PROPERTY,
            links(&["AT1G19180", "AT9G99999"]),
        );
        let cluster = Identity::new("skm:17");
        let mut diagnostics = Diagnostics::new();

        let (genes, edges) =
            expand_cluster_genes(&record, &cluster, &annotations, &mut diagnostics);

        assert_eq!(genes.len(), 1);
        assert_eq!(genes[0].id.as_str(), "tair:AT1G19180");
        assert_eq!(genes[0].node_type, "gene");
        assert_eq!(genes[0].properties["tair"], PropertyValue::from("AT1G19180"));
        assert_eq!(genes[0].properties["species"], PropertyValue::from("Arabidopsis thaliana"));
        assert!(genes[0].properties.contains_key("url"));

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source.as_str(), "tair:AT1G19180");
        assert_eq!(edges[0].target.as_str(), "skm:17");
        assert_eq!(edges[0].edge_type, "functional_cluster_member");

        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics.entries()[0].message.contains("AT9G99999"));
    }
}
