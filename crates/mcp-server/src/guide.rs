//! Static documentation served as MCP resources.

pub const OPENAPI_RESOURCE_URI: &str = "openapi://acomo";
pub const AUTH_GUIDE_URI: &str = "guide://auth";

/// Markdown guide for the headers every backend call carries.
pub const AUTH_GUIDE: &str = "\
# acomo authentication and headers

Every request to the acomo API carries:

- `Authorization: Bearer <ACCESS_TOKEN>`
- `x-tenant-id: <TENANT_ID>`
- `Content-Type: application/json`

The MCP server reads them from `ACOMO_ACCESS_TOKEN` and `ACOMO_TENANT_ID`.
`callOperation` refuses to run while either is unset.

Server-side example (Next.js):

```ts
const headers = {
  Authorization: 'Bearer ' + process.env.ACOMO_ACCESS_TOKEN,
  'x-tenant-id': process.env.ACOMO_TENANT_ID,
  'Content-Type': 'application/json',
};
```
";
