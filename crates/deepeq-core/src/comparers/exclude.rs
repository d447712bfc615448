use crate::config::ComparisonConfig;
use crate::value::MemberDescriptor;

/// Whether configuration rules remove `member` of type `owner` from the
/// comparison, by bare name, by `Type.Name`, or by attribute.
pub fn should_exclude_member(
    config: &ComparisonConfig,
    owner: &str,
    member: &MemberDescriptor,
) -> bool {
    if config.members_to_ignore.contains(member.name())
        || config
            .members_to_ignore
            .contains(&format!("{}.{}", owner, member.name()))
    {
        return true;
    }

    member
        .attributes()
        .iter()
        .any(|attribute| config.attributes_to_ignore.contains(attribute))
}
