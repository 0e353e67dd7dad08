#[cfg(test)]
mod tests {
    use docfold::parser::*;

    use docfold::*;
    use serde::Deserialize;

    use std::fs::File;
    use std::io::Read;
    use std::path::Path;
    use test_generator::test_resources;

    #[derive(Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    struct ExpectedReport {
        pub containers: usize,
        pub toggles_created: usize,
        pub toggles_bound: usize,
        pub links_rewritten: usize,
        pub copy_buttons_added: usize,
        pub lazy_images_observed: usize,
    }

    const TEST_TEXTURE_DIR: &str = "./";

    fn collapse_whitespace(input: &str) -> String {
        return regex::Regex::new(r"\s+")
            .unwrap()
            .replace_all(input, " ")
            .trim()
            .to_string();
    }

    fn equal_trees(expected: &NodeRef, actual: &NodeRef) -> bool {
        let mut stack: Vec<(NodeRef, NodeRef, String)> =
            vec![(expected.clone(), actual.clone(), "root".to_string())];

        let summarize = |n: &NodeRef| {
            if let Some(name) = n.element_name() {
                name.to_string()
            } else if n.as_text().is_some() {
                let t = n.text_contents();
                let t = t.trim().chars().take(30).collect::<String>();
                format!("text:{}", t)
            } else if n.as_comment().is_some() {
                "comment".to_string()
            } else {
                "node".to_string()
            }
        };

        while let Some((expected_node, actual_node, path)) = stack.pop() {
            if expected_node.element_name() != actual_node.element_name() {
                println!(
                    "Failed: element names don't match at {}: {:#?}\n\n{:#?}",
                    path,
                    expected_node.element_name(),
                    actual_node.element_name()
                );
                return false;
            }

            match (expected_node.as_element(), actual_node.as_element()) {
                (Some(l), Some(r)) => {
                    if l.attributes.borrow().map != r.attributes.borrow().map {
                        println!(
                            "Failed: attributes don't match at {}: Expected: {:#?}\n\nActual:{:#?}",
                            path,
                            l.attributes.borrow().map,
                            r.attributes.borrow().map
                        );
                        return false;
                    }
                }
                (Some(_), None) | (None, Some(_)) => {
                    println!(
                        "Failed: node types don't match at {}: {:#?}\n\nActual:{:#?}",
                        path, expected_node, actual_node
                    );
                    return false;
                }
                (None, None) => (),
            }

            match (expected_node.as_text(), actual_node.as_text()) {
                (Some(_), Some(_)) => {
                    let expected_text = collapse_whitespace(&expected_node.text_contents());
                    let actual_text = collapse_whitespace(&actual_node.text_contents());
                    if expected_text != actual_text {
                        println!(
                            "Failed: text nodes doesn't match at {}: Expected: {} \n\n Actual: {}",
                            path, expected_text, actual_text
                        );
                        return false;
                    }
                    continue;
                }
                (Some(_), None) | (None, Some(_)) => {
                    println!(
                        "Failed: node types don't match at {}: {:#?}\n\nActual:{:#?}",
                        path, expected_node, actual_node
                    );
                    return false;
                }
                (None, None) => (),
            }

            let expected_children = expected_node
                .children()
                .filter(|n| n.as_comment().is_none())
                .filter(|n| !n.text_contents().trim().is_empty() || n.as_element().is_some())
                .collect::<Vec<_>>();
            let actual_children = actual_node
                .children()
                .filter(|n| n.as_comment().is_none())
                .filter(|n| !n.text_contents().trim().is_empty() || n.as_element().is_some())
                .collect::<Vec<_>>();
            if expected_children.len() != actual_children.len() {
                let expected_names = expected_children
                    .iter()
                    .map(|n| summarize(n))
                    .collect::<Vec<_>>();
                let actual_names = actual_children
                    .iter()
                    .map(|n| summarize(n))
                    .collect::<Vec<_>>();
                println!(
                    "Failed: child counts don't match at {}: {:#?} vs {:#?}\nExpected: {:?}\nActual: {:?}",
                    path,
                    expected_children.len(),
                    actual_children.len(),
                    expected_names,
                    actual_names
                );
                return false;
            }

            for (i, expected_child_node) in expected_children.iter().enumerate() {
                let actual_child_node = actual_children.get(i).unwrap();
                let child_path = format!("{}/{}", path, i);
                stack.push((
                    expected_child_node.clone(),
                    actual_child_node.clone(),
                    child_path,
                ));
            }
        }

        true
    }

    fn document_root(node: &NodeRef) -> NodeRef {
        if let Ok(html) = node.select_first("html") {
            return html.as_node().clone();
        }
        if let Some(child) = node.first_child() {
            return child;
        }
        node.clone()
    }

    pub fn html_contents_are_equal(expected: &str, actual: &str) -> bool {
        let e_norm = parse_html(expected);
        let a_norm = parse_html(actual);
        let e_root = document_root(&e_norm);
        let a_root = document_root(&a_norm);
        equal_trees(&e_root, &a_root)
    }

    fn body_html(document: &NodeRef) -> String {
        let body = document.select_first("body").unwrap();
        body.as_node().inner_html()
    }

    fn test(resource: &str) {
        let source = get_source_from_dir(resource);
        let options = get_options_from_dir(resource);
        let page = enhance(source.as_str(), options);

        let report = get_expected_report_from_dir(resource);
        assert_eq!(page.report.containers, report.containers);
        assert_eq!(page.report.toggles_created, report.toggles_created);
        assert_eq!(page.report.toggles_bound, report.toggles_bound);
        assert_eq!(page.report.links_rewritten, report.links_rewritten);
        assert_eq!(page.report.copy_buttons_added, report.copy_buttons_added);
        assert_eq!(page.report.lazy_images_observed, report.lazy_images_observed);

        let content = body_html(&page.document);
        let expected = get_expected_from_dir(resource);
        let equal = html_contents_are_equal(expected.as_str(), content.as_str());
        assert!(equal);

        // Restructuring the output again must not change it.
        let before = page.to_html();
        let mains: Vec<NodeRef> = page
            .document
            .select("main")
            .unwrap()
            .map(|m| m.as_node().clone())
            .collect();
        for main in &mains {
            sections::restructure(main, &MarkerClasses::default());
        }
        assert_eq!(page.to_html(), before);
    }

    fn get_file_content(file_path: &str) -> String {
        let path = Path::new(file_path);
        let mut content = String::new();
        let mut file = File::open(path).unwrap();
        file.read_to_string(&mut content).unwrap();
        content
    }

    fn get_source_from_dir(dir: &str) -> String {
        let fil_path = format!("{}{}/source.html", TEST_TEXTURE_DIR, dir);
        get_file_content(fil_path.as_str())
    }

    fn get_options_from_dir(dir: &str) -> EnhanceOptions {
        let fil_path = format!("{}{}/options.json", TEST_TEXTURE_DIR, dir);
        if !Path::new(fil_path.as_str()).exists() {
            return EnhanceOptions::default();
        }
        EnhanceOptions::from_json_str(get_file_content(fil_path.as_str()).as_str()).unwrap()
    }

    fn get_expected_report_from_dir(dir: &str) -> ExpectedReport {
        let fil_path = format!("{}{}/expected-report.json", TEST_TEXTURE_DIR, dir);
        let report_string = get_file_content(fil_path.as_str());
        let report: ExpectedReport = serde_json::from_str(report_string.as_str()).unwrap();
        report
    }

    fn get_expected_from_dir(dir: &str) -> String {
        let fil_path = format!("{}{}/expected.html", TEST_TEXTURE_DIR, dir);
        let html = get_file_content(fil_path.as_str());
        let document = parse_html(html.as_str());
        body_html(&document)
    }

    #[test_resources("./test_textures/*")]
    fn run(resource: &str) {
        if resource.ends_with("DS_Store") {
            return;
        }
        test(resource);
    }

    #[test]
    fn testable_properties_sequence() {
        let page = enhance(
            "<main><h2>H</h2><p>p0</p><h3>a</h3><p>p1</p><p>p2</p><h3>b</h3><span>s</span></main>",
            EnhanceOptions::default(),
        );
        let main = page.document.select_first("main").unwrap().as_node().clone();
        assert_eq!(
            main.inner_html(),
            concat!(
                "<h2>H</h2><p>p0</p>",
                r#"<button class="collapsible">a</button>"#,
                r#"<div class="content"><p>p1</p><p>p2</p></div>"#,
                r#"<button class="collapsible">b</button>"#,
                r#"<div class="content"><span>s</span></div>"#
            )
        );
    }

    #[test]
    fn interactive_session() {
        use docfold::copy_code::MemoryClipboard;
        use docfold::lazy_images::IntersectionEntry;
        use docfold::sections::{FixedHeight, ToggleState};
        use std::time::Instant;

        let mut page = enhance(
            r#"<main><h3>Run</h3><pre>  go()  </pre><img class="lazy" data-src="a.png"></main>"#,
            EnhanceOptions::default(),
        );

        let toggle = page.toggles.controls().next().unwrap().clone();
        assert_eq!(
            page.toggles.click(&toggle, &FixedHeight(30)),
            Some(ToggleState::Expanded)
        );
        assert_eq!(
            page.toggles.click(&toggle, &FixedHeight(30)),
            Some(ToggleState::Collapsed)
        );
        assert!(!page.to_html().contains("max-height"));

        let copy = page.copy_buttons.buttons().next().unwrap().clone();
        let mut clipboard = MemoryClipboard::default();
        let now = Instant::now();
        page.copy_buttons.click(&copy, &mut clipboard, now);
        assert_eq!(clipboard.contents.as_deref(), Some("go()"));
        assert_eq!(page.copy_buttons.tick(now + copy_code::FEEDBACK_DURATION), 1);

        let img = page.document.select_first("img").unwrap().as_node().clone();
        assert_eq!(
            page.lazy_images
                .on_intersections(vec![IntersectionEntry::visible(&img)]),
            1
        );
        assert_eq!(img.attr_value("src").as_deref(), Some("a.png"));
        assert!(!img.has_class("lazy"));
    }

    #[test]
    fn debug_this() {
        let resource = match std::env::var("DOCFOLD_DEBUG_RESOURCE") {
            Ok(value) => value,
            Err(_) => return,
        };
        let source = get_source_from_dir(resource.as_str());
        let options = get_options_from_dir(resource.as_str());
        let page = enhance(source.as_str(), options);
        let actual = body_html(&page.document);
        let expected = get_expected_from_dir(resource.as_str());
        std::fs::write("/tmp/docfold-expected.html", expected.as_bytes()).unwrap();
        std::fs::write("/tmp/docfold-actual.html", actual.as_bytes()).unwrap();
        println!("Wrote /tmp/docfold-expected.html and /tmp/docfold-actual.html");
    }
}
