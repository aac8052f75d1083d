use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use csvgate_model::IssueSuite;

use crate::error::Result;

/// Render every suite as one `<testsuites>` document.
pub(crate) fn render_junit(suites: &[IssueSuite]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let total: usize = suites.iter().map(IssueSuite::len).sum();
    let total = total.to_string();
    let mut root = BytesStart::new("testsuites");
    root.push_attribute(("name", "csvgate"));
    root.push_attribute(("tests", total.as_str()));
    root.push_attribute(("failures", total.as_str()));
    writer.write_event(Event::Start(root))?;

    for suite in suites {
        let name = suite.source().unwrap_or("csvgate");
        let count = suite.len().to_string();
        let mut element = BytesStart::new("testsuite");
        element.push_attribute(("name", name));
        element.push_attribute(("tests", count.as_str()));
        element.push_attribute(("failures", count.as_str()));
        element.push_attribute(("errors", "0"));
        writer.write_event(Event::Start(element))?;

        for issue in suite {
            let case_name = format!("{} at line {}, column {}", issue.code, issue.line, issue.column);
            let mut case = BytesStart::new("testcase");
            case.push_attribute(("name", case_name.as_str()));
            case.push_attribute(("classname", name));
            writer.write_event(Event::Start(case))?;

            let mut failure = BytesStart::new("failure");
            failure.push_attribute(("type", issue.code.as_str()));
            failure.push_attribute(("message", issue.message.as_str()));
            writer.write_event(Event::Start(failure))?;
            writer.write_event(Event::Text(BytesText::new(&issue.to_string())))?;
            writer.write_event(Event::End(BytesEnd::new("failure")))?;

            writer.write_event(Event::End(BytesEnd::new("testcase")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("testsuites")))?;

    let mut xml = String::from_utf8(writer.into_inner())?;
    xml.push('\n');
    Ok(xml)
}
