//! MEI parser implementation
//!
//! Builds a [`Page`] from an MEI document using roxmltree. Square-note files
//! carry one `<sb>` per staff with the staff box on its `facs` zone; the
//! clefs, neumes, divisions and custos that follow an `<sb>` belong to that
//! staff. Staffless files list their neumes under `<section>` and use `<sb>`
//! only as a separator.

use std::collections::HashMap;

use roxmltree::{Document as XmlDocument, Node};

use crate::classify::NotationStyle;
use crate::config::EditorConfig;
use crate::errors::{ImportError, ModelError};
use crate::models::clef::{Clef, ClefShape};
use crate::models::elements::{BoundingBox, Custos, Division, DivisionKind, Liquescence, Ornament};
use crate::models::neume::{neume_from_data, Neume, NoteData};
use crate::models::page::Page;
use crate::models::pitch::Pitch;
use crate::models::staff::Staff;

/// Result type for MEI parsing operations
pub type MeiResult<T> = Result<T, ImportError>;

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Parse an MEI document into a page of the configured notation style
pub fn parse_mei(xml: &str, config: &EditorConfig) -> MeiResult<Page> {
    let doc = XmlDocument::parse(xml).map_err(|e| ImportError::Xml(e.to_string()))?;
    let zones = collect_zones(&doc)?;

    let mut page = Page::new(config.clone());
    page.id = doc
        .descendants()
        .find(|n| n.has_tag_name("page"))
        .and_then(xml_id)
        .map(str::to_string);

    match config.style {
        NotationStyle::SquareNote => load_square_note(&doc, &zones, &mut page)?,
        NotationStyle::Cheironomic => load_cheironomic(&doc, &zones, &mut page)?,
    }

    log::info!(
        "loaded MEI page {:?}: {} staves, {} neumes",
        page.id,
        page.staves.len(),
        page.staves.iter().map(|s| s.neumes().count()).sum::<usize>()
    );
    Ok(page)
}

/// Elements that follow one system break, in document order
#[derive(Default)]
struct SystemNodes<'a, 'input> {
    clefs: Vec<Node<'a, 'input>>,
    neumes: Vec<Node<'a, 'input>>,
    divisions: Vec<Node<'a, 'input>>,
    custos: Vec<Node<'a, 'input>>,
}

fn load_square_note(doc: &XmlDocument, zones: &HashMap<String, BoundingBox>, page: &mut Page) -> MeiResult<()> {
    let mut systems: Vec<(Node, SystemNodes)> = Vec::new();

    for node in doc.descendants().filter(Node::is_element) {
        let name = node.tag_name().name();
        if name == "sb" {
            systems.push((node, SystemNodes::default()));
            continue;
        }
        // anything before the first system break has no staff
        let Some((_, nodes)) = systems.last_mut() else { continue };
        match name {
            "clef" => nodes.clefs.push(node),
            "neume" => nodes.neumes.push(node),
            "division" => nodes.divisions.push(node),
            "custos" => nodes.custos.push(node),
            _ => {}
        }
    }

    let num_lines = page.config.num_lines;
    for (sb, nodes) in systems {
        let zone = zone_for(&sb, zones)?;
        let mut staff = Staff::new(zone, num_lines);
        staff.id = xml_id(sb).map(str::to_string);
        let order_number = sb.attribute("n").and_then(|n| n.parse().ok());

        for node in nodes.clefs {
            let clef = parse_clef(&node, &staff, zones)?;
            staff.add_clef(clef, false);
        }
        for node in nodes.neumes {
            let neume = parse_square_neume(&node, zones)?;
            match staff.add_neume(neume, false) {
                Ok(_) => {}
                Err(ModelError::NoGoverningClef) => skip_unclefed("neume", node),
                Err(e) => return Err(e.into()),
            }
        }
        for node in nodes.divisions {
            let division = parse_division(&node, zones)?;
            staff.add_division(division, false);
        }
        for node in nodes.custos {
            let custos = parse_custos(&node, zones)?;
            match staff.set_custos(custos) {
                Ok(_) => {}
                Err(ModelError::NoGoverningClef) => skip_unclefed("custos", node),
                Err(e) => return Err(e.into()),
            }
        }

        let index = page.add_staff(staff);
        if order_number.is_some() {
            page.staves[index].order_number = order_number;
        }
    }
    Ok(())
}

/// Elements left of the first clef have no pitch; the page loads without them
fn skip_unclefed(kind: &str, node: Node) {
    log::warn!(
        "skipping {} '{}': no clef governs its position",
        kind,
        xml_id(node).unwrap_or("?")
    );
}

fn load_cheironomic(doc: &XmlDocument, zones: &HashMap<String, BoundingBox>, page: &mut Page) -> MeiResult<()> {
    let section = doc
        .descendants()
        .find(|n| n.has_tag_name("section"))
        .ok_or_else(|| ImportError::MissingElement("section".to_string()))?;

    let mut group: Vec<Node> = Vec::new();
    for child in section.children().filter(Node::is_element) {
        if child.has_tag_name("sb") {
            add_staffless_staff(page, &group, xml_id(child), zones)?;
            group.clear();
        } else {
            group.push(child);
        }
    }
    add_staffless_staff(page, &group, None, zones)?;
    Ok(())
}

fn add_staffless_staff(
    page: &mut Page,
    nodes: &[Node],
    id: Option<&str>,
    zones: &HashMap<String, BoundingBox>,
) -> MeiResult<()> {
    let mut staff = Staff::new(BoundingBox::default(), 0);
    staff.id = id.map(str::to_string);

    for node in nodes.iter().filter(|n| n.has_tag_name("neume")) {
        let (neume, encoded_name) = parse_staffless_neume(node, zones)?;
        let index = staff.add_neume(neume, true)?;

        // without intervals the encoded name is all there is to go on
        if let Some(name) = encoded_name {
            let neume = staff.neume_mut(index)?;
            neume.name = Some(title_case(&name));
            neume.typeid = Some(name);
            neume.neume_prefix = None;
        }
    }
    page.add_staff(staff);
    Ok(())
}

fn parse_clef(node: &Node, staff: &Staff, zones: &HashMap<String, BoundingBox>) -> MeiResult<Clef> {
    let shape: ClefShape = required(node, "shape")?
        .parse()
        .map_err(|_| invalid(node, "shape"))?;
    let line: i32 = required(node, "line")?
        .trim()
        .parse()
        .map_err(|_| invalid(node, "line"))?;

    let mut clef = Clef::new(shape, Some(staff.staff_pos_from_line(line))).with_zone(zone_for(node, zones)?);
    clef.id = xml_id(*node).map(str::to_string);
    Ok(clef)
}

fn parse_division(node: &Node, zones: &HashMap<String, BoundingBox>) -> MeiResult<Division> {
    let kind: DivisionKind = format!("div_{}", required(node, "form")?)
        .parse()
        .map_err(|_| invalid(node, "form"))?;

    let mut division = Division::new(kind, zone_for(node, zones)?);
    division.id = xml_id(*node).map(str::to_string);
    Ok(division)
}

fn parse_custos(node: &Node, zones: &HashMap<String, BoundingBox>) -> MeiResult<Custos> {
    let oct: i32 = required(node, "oct")?
        .trim()
        .parse()
        .map_err(|_| invalid(node, "oct"))?;
    let pitch = Pitch::parse(required(node, "pname")?, oct)?;

    let mut custos = Custos::new(pitch, zone_for(node, zones)?);
    custos.id = xml_id(*node).map(str::to_string);
    Ok(custos)
}

/// MEI neume name, with liquescent names split into base name and modifier
fn neume_name(node: &Node) -> (String, Option<Liquescence>) {
    let name = node.attribute("name").unwrap_or_default().to_ascii_lowercase();
    match name.as_str() {
        "epiphonus" => ("podatus".to_string(), Some(Liquescence::Plain)),
        "cephalicus" => ("clivis".to_string(), Some(Liquescence::Plain)),
        _ => (name, None),
    }
}

/// Head shape of a note from its `<nc>` parent, else from the neume name
fn head_shape_for(note: &Node, neume_name: &str, style: NotationStyle) -> &'static str {
    let parent_flag = |attr: &str| {
        note.parent_element()
            .and_then(|p| p.attribute(attr))
            .map_or(false, |v| v == "true")
    };

    if !style.is_staffless() && parent_flag("inclinatum") {
        if parent_flag("deminutus") {
            "punctum_inclinatum_parvum"
        } else {
            "punctum_inclinatum"
        }
    } else if parent_flag("quilisma") {
        "quilisma"
    } else if matches!(neume_name, "virga" | "bivirga" | "trivirga") {
        "virga"
    } else if !style.is_staffless() && neume_name == "cavum" {
        "cavum"
    } else {
        "punctum"
    }
}

fn dot_ornaments(note: &Node) -> Vec<Ornament> {
    note.children()
        .filter(|c| c.has_tag_name("dot"))
        .filter_map(|c| c.attribute("form"))
        .map(|form| Ornament::dot(Some(form)))
        .take(1)
        .collect()
}

fn parse_square_neume(node: &Node, zones: &HashMap<String, BoundingBox>) -> MeiResult<Neume> {
    let (name, modifier) = neume_name(node);

    let mut notes = Vec::new();
    for note in node.descendants().filter(|n| n.has_tag_name("note")) {
        let oct: i32 = required(&note, "oct")?
            .trim()
            .parse()
            .map_err(|_| invalid(&note, "oct"))?;
        let mut data = NoteData::pitched(required(&note, "pname")?, oct)
            .with_head_shape(head_shape_for(&note, &name, NotationStyle::SquareNote));
        data.ornaments = dot_ornaments(&note);
        notes.push(data);
    }

    let mut neume = neume_from_data(NotationStyle::SquareNote, &notes, zone_for(node, zones)?, modifier)?;
    neume.id = xml_id(*node).map(str::to_string);
    Ok(neume)
}

/// Movement of a staffless note: up, down, same, unknown or a signed step count
fn parse_interval(note: &Node) -> MeiResult<Option<i32>> {
    let value = match note.attribute("intm") {
        Some(v) => v.trim(),
        None => return Ok(None),
    };
    let step = match value {
        "u" => 1,
        "d" => -1,
        "s" | "n" => 0,
        other => other
            .trim_start_matches('+')
            .parse()
            .map_err(|_| invalid(note, "intm"))?,
    };
    Ok(Some(step))
}

/// Parse a staffless neume; the MEI name is returned when the notes carry
/// no intervals to classify from
fn parse_staffless_neume(node: &Node, zones: &HashMap<String, BoundingBox>) -> MeiResult<(Neume, Option<String>)> {
    let (name, modifier) = neume_name(node);

    let mut notes = Vec::new();
    let mut all_intervals = true;
    for (i, note) in node.descendants().filter(|n| n.has_tag_name("note")).enumerate() {
        let interval = parse_interval(&note)?;
        if i > 0 && interval.is_none() {
            all_intervals = false;
        }
        let mut data = NoteData::default().with_head_shape(head_shape_for(&note, &name, NotationStyle::Cheironomic));
        data.relative_pitch = interval;
        data.ornaments = dot_ornaments(&note);
        notes.push(data);
    }

    let mut neume = neume_from_data(NotationStyle::Cheironomic, &notes, zone_for(node, zones)?, modifier)?;
    neume.id = xml_id(*node).map(str::to_string);

    let encoded_name = if !all_intervals && !name.is_empty() { Some(name) } else { None };
    Ok((neume, encoded_name))
}

fn title_case(name: &str) -> String {
    name.split('.')
        .next()
        .unwrap_or_default()
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn collect_zones(doc: &XmlDocument) -> MeiResult<HashMap<String, BoundingBox>> {
    let mut zones = HashMap::new();
    for zone in doc.descendants().filter(|n| n.has_tag_name("zone")) {
        let Some(id) = xml_id(zone) else { continue };

        let mut coords = [0.0; 4];
        for (slot, attr) in coords.iter_mut().zip(["ulx", "uly", "lrx", "lry"]) {
            *slot = required(&zone, attr)?
                .trim()
                .parse()
                .map_err(|_| invalid(&zone, attr))?;
        }
        zones.insert(id.to_string(), BoundingBox::from_array(coords)?);
    }
    Ok(zones)
}

fn zone_for(node: &Node, zones: &HashMap<String, BoundingBox>) -> MeiResult<BoundingBox> {
    let facs = required(node, "facs")?;
    let id = facs.trim().trim_start_matches('#');
    zones
        .get(id)
        .copied()
        .ok_or_else(|| ImportError::MissingElement(format!("zone '{}'", id)))
}

fn xml_id<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.attribute((XML_NS, "id"))
}

fn required<'a>(node: &Node<'a, '_>, attribute: &str) -> MeiResult<&'a str> {
    node.attribute(attribute).ok_or_else(|| ImportError::MissingAttribute {
        element: node.tag_name().name().to_string(),
        attribute: attribute.to_string(),
    })
}

fn invalid(node: &Node, attribute: &str) -> ImportError {
    ImportError::InvalidValue {
        element: node.tag_name().name().to_string(),
        attribute: attribute.to_string(),
        value: node.attribute(attribute).unwrap_or_default().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::elements::HeadShape;
    use crate::models::pitch::PitchName;

    const SQUARE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<mei xmlns="http://www.music-encoding.org/ns/mei">
  <music>
    <facsimile>
      <surface>
        <zone xml:id="z-s1" ulx="100" uly="200" lrx="1100" lry="260"/>
        <zone xml:id="z-c1" ulx="105" uly="200" lrx="125" lry="220"/>
        <zone xml:id="z-n1" ulx="200" uly="210" lrx="260" lry="240"/>
        <zone xml:id="z-n2" ulx="300" uly="210" lrx="320" lry="230"/>
        <zone xml:id="z-d1" ulx="400" uly="200" lrx="405" lry="260"/>
        <zone xml:id="z-cu" ulx="1080" uly="210" lrx="1090" lry="220"/>
      </surface>
    </facsimile>
    <body><mdiv><score><section><staff><layer>
      <sb xml:id="sb-1" n="1" facs="z-s1"/>
      <clef xml:id="c-1" shape="C" line="4" facs="z-c1"/>
      <neume xml:id="n-1" name="cephalicus" facs="z-n1">
        <nc><note pname="d" oct="4"/><note pname="c" oct="4"/></nc>
      </neume>
      <neume xml:id="n-2" name="punctum" facs="z-n2">
        <nc inclinatum="true"><note pname="a" oct="3"><dot form="aug"/></note></nc>
      </neume>
      <division xml:id="d-1" form="major" facs="z-d1"/>
      <custos xml:id="cu-1" pname="e" oct="4" facs="z-cu"/>
    </layer></staff></section></score></mdiv></body>
  </music>
</mei>"#;

    #[test]
    fn test_square_note_staff() {
        let page = parse_mei(SQUARE, &EditorConfig::default()).unwrap();
        assert_eq!(page.staves.len(), 1);

        let staff = &page.staves[0];
        assert_eq!(staff.id.as_deref(), Some("sb-1"));
        assert_eq!(staff.delta_y, Some(20.0));
        assert_eq!(staff.len(), 5);

        let clef = staff.clef(0).unwrap();
        assert_eq!(clef.shape, ClefShape::C);
        assert_eq!(clef.staff_pos, 0);

        let n1 = staff.neume(1).unwrap();
        assert_eq!(n1.id.as_deref(), Some("n-1"));
        assert_eq!(n1.modifier, Some(Liquescence::Plain));
        assert_eq!(n1.typeid.as_deref(), Some("cephalicus"));
        assert_eq!(n1.root_staff_pos, Some(1));

        let n2 = staff.neume(2).unwrap();
        assert_eq!(n2.components[0].head_shape, HeadShape::PunctumInclinatum);
        assert_eq!(n2.components[0].ornaments[0].form, "aug");

        let custos = staff.custos().unwrap();
        assert_eq!(custos.pitch, Pitch::new(PitchName::E, 4));
        assert_eq!(custos.root_staff_pos, Some(2));
    }

    #[test]
    fn test_neume_inside_clef_box_is_skipped() {
        let xml = SQUARE.replace(
            r#"<zone xml:id="z-n2" ulx="300""#,
            r#"<zone xml:id="z-n2" ulx="110""#,
        );
        let page = parse_mei(&xml, &EditorConfig::default()).unwrap();

        let staff = &page.staves[0];
        assert_eq!(staff.len(), 4);
        assert_eq!(page.find_element("n-2"), None);
        assert_eq!(staff.neume(1).unwrap().id.as_deref(), Some("n-1"));
        assert_eq!(staff.custos().unwrap().id.as_deref(), Some("cu-1"));
    }

    #[test]
    fn test_custos_inside_clef_box_is_skipped() {
        let xml = SQUARE.replace(
            r#"<zone xml:id="z-cu" ulx="1080""#,
            r#"<zone xml:id="z-cu" ulx="100""#,
        );
        let page = parse_mei(&xml, &EditorConfig::default()).unwrap();

        let staff = &page.staves[0];
        assert!(staff.custos().is_none());
        assert_eq!(staff.neumes().count(), 2);
    }

    #[test]
    fn test_missing_zone_is_reported() {
        let xml = SQUARE.replace(r#"facs="z-n2""#, r#"facs="z-missing""#);
        let err = parse_mei(&xml, &EditorConfig::default()).unwrap_err();
        assert_eq!(err, ImportError::MissingElement("zone 'z-missing'".to_string()));
    }

    #[test]
    fn test_bad_clef_line() {
        let xml = SQUARE.replace(r#"line="4""#, r#"line="top""#);
        assert!(matches!(
            parse_mei(&xml, &EditorConfig::default()),
            Err(ImportError::InvalidValue { attribute, .. }) if attribute == "line"
        ));
    }

    #[test]
    fn test_malformed_xml() {
        assert!(matches!(
            parse_mei("<mei><unclosed></mei>", &EditorConfig::default()),
            Err(ImportError::Xml(_))
        ));
    }

    const STAFFLESS: &str = r##"<mei xmlns="http://www.music-encoding.org/ns/mei">
  <facsimile><surface>
    <zone xml:id="z1" ulx="10" uly="10" lrx="30" lry="40"/>
    <zone xml:id="z2" ulx="40" uly="10" lrx="60" lry="40"/>
    <zone xml:id="z3" ulx="10" uly="90" lrx="30" lry="120"/>
  </surface></facsimile>
  <section>
    <neume xml:id="n1" name="pes" facs="#z1"><note/><note intm="u"/></neume>
    <neume xml:id="n2" name="virga" facs="#z2"><note/></neume>
    <sb xml:id="sb1"/>
    <neume xml:id="n3" name="torculus" facs="#z3"><note/><note/><note/></neume>
  </section>
</mei>"##;

    #[test]
    fn test_staffless_split_at_breaks() {
        let config = EditorConfig::for_style(NotationStyle::Cheironomic);
        let page = parse_mei(STAFFLESS, &config).unwrap();
        assert_eq!(page.staves.len(), 2);
        assert_eq!(page.staves[0].id.as_deref(), Some("sb1"));
        assert_eq!(page.staves[0].num_lines, 0);

        let pes = page.staves[0].neume(0).unwrap();
        assert_eq!(pes.typeid.as_deref(), Some("pes"));
        assert_eq!(page.staves[0].neume(1).unwrap().components[0].head_shape, HeadShape::Virga);

        // no intervals encoded, so the MEI name is kept
        let torculus = page.staves[1].neume(0).unwrap();
        assert_eq!(torculus.typeid.as_deref(), Some("torculus"));
        assert_eq!(torculus.name.as_deref(), Some("Torculus"));
    }

    #[test]
    fn test_interval_values() {
        let xml = r#"<neume><note intm="d"/><note intm="-2"/><note intm="s"/><note intm="x"/><note/></neume>"#;
        let doc = XmlDocument::parse(xml).unwrap();
        let notes: Vec<Node> = doc.descendants().filter(|n| n.has_tag_name("note")).collect();
        assert_eq!(parse_interval(&notes[0]).unwrap(), Some(-1));
        assert_eq!(parse_interval(&notes[1]).unwrap(), Some(-2));
        assert_eq!(parse_interval(&notes[2]).unwrap(), Some(0));
        assert!(parse_interval(&notes[3]).is_err());
        assert_eq!(parse_interval(&notes[4]).unwrap(), None);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("scandicus.flexus.2"), "Scandicus");
        assert_eq!(title_case("porrectus"), "Porrectus");
    }
}
