// Chat page served by the UI server.
//
// The script only forwards events to `/action/{name}` and redraws from the
// returned view; formatting and request handling happen server-side.

use crate::markup::escape_html;

/// Build the complete HTML page for the chat interface.
pub fn build_chat_page(title: &str) -> String {
    CHAT_PAGE.replace("{{title}}", &escape_html(title))
}

const CHAT_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>{{title}}</title>
<style>
*{margin:0;padding:0;box-sizing:border-box}
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;background:#1e1e1e;color:#cccccc;height:100vh;display:flex;flex-direction:column}
.header{padding:16px 20px;background:#252526;border-bottom:1px solid #3c3c3c;display:flex;align-items:center;gap:12px}
.header h1{font-size:16px;font-weight:600;flex:1}
.header button{padding:6px 12px;background:#313131;color:#cccccc;border:1px solid #3c3c3c;border-radius:6px;cursor:pointer}
#chatBox{flex:1;overflow-y:auto;padding:20px;display:flex;flex-direction:column;gap:10px}
.message{max-width:80%;padding:10px 14px;border-radius:12px;font-size:14px;line-height:1.5;word-wrap:break-word}
.user-message{align-self:flex-end;background:#2a2d2e;border:1px solid #4a90d933;white-space:pre-wrap}
.bot-message{align-self:flex-start;background:#252526;border:1px solid #3c3c3c}
.bot-message pre{background:#111;padding:8px;border-radius:6px;overflow-x:auto}
.input-bar{padding:16px 20px;background:#252526;border-top:1px solid #3c3c3c;display:flex;gap:8px}
.input-bar input{flex:1;padding:10px 14px;border:1px solid #3c3c3c;border-radius:8px;background:#313131;color:#cccccc;font-size:14px;outline:none}
.input-bar button,.modal button{padding:10px 20px;background:#4a90d9;color:#fff;border:none;border-radius:8px;font-weight:600;cursor:pointer}
#settingsModal{display:none;position:fixed;inset:0;background:rgba(0,0,0,.6)}
.modal{background:#252526;max-width:420px;margin:60px auto;padding:20px;border-radius:10px;display:flex;flex-direction:column;gap:8px}
.modal label{font-size:12px;color:#999}
.modal input,.modal textarea{padding:8px;background:#313131;color:#cccccc;border:1px solid #3c3c3c;border-radius:6px}
.modal .row{display:flex;gap:8px;justify-content:flex-end}
</style>
</head>
<body>
<div class="header">
  <h1>{{title}}</h1>
  <button id="clearHistory">Clear</button>
  <button id="openSettings">Settings</button>
</div>
<div id="chatBox"></div>
<div class="input-bar">
  <input id="userInput" placeholder="Type a message..." autofocus />
  <button id="sendButton">Send</button>
</div>
<div id="settingsModal">
  <div class="modal">
    <label for="model">Model</label><input id="model" />
    <label for="temperature">Temperature</label><input id="temperature" />
    <label for="top_p">Top P</label><input id="top_p" />
    <label for="top_k">Top K</label><input id="top_k" />
    <label for="max_output_tokens">Max output tokens</label><input id="max_output_tokens" />
    <label for="system_prompt">System prompt</label><textarea id="system_prompt" rows="4"></textarea>
    <div class="row">
      <button id="closeSettings">Close</button>
      <button id="saveSettings">Save</button>
    </div>
  </div>
</div>
<script>
const FIELDS=["model","temperature","top_p","top_k","max_output_tokens","system_prompt"];
const chatBox=document.getElementById("chatBox");
const input=document.getElementById("userInput");
const modal=document.getElementById("settingsModal");
let polling=false;

function apply(view,syncForm){
  chatBox.innerHTML=view.transcript.join("");
  chatBox.scrollTop=chatBox.scrollHeight;
  if(view.clear_input)input.value="";
  if(syncForm)FIELDS.forEach(f=>{document.getElementById(f).value=view.form[f]});
  modal.style.display=view.settings_open?"block":"none";
  if(view.pending_replies>0&&!polling){polling=true;setTimeout(refresh,300)}
}

async function refresh(){
  polling=false;
  try{
    const res=await fetch("/state");
    apply(await res.json(),false);
  }catch(e){console.error("Failed to refresh",e)}
}

async function act(name,payload,syncForm){
  try{
    const res=await fetch("/action/"+name,{
      method:"POST",
      headers:{"Content-Type":"application/json"},
      body:JSON.stringify(payload||{})
    });
    if(!res.ok){console.error("Action failed",name,res.status);return}
    apply(await res.json(),syncForm);
  }catch(e){console.error("Action failed",name,e)}
}

function readForm(){
  const form={};
  FIELDS.forEach(f=>{form[f]=document.getElementById(f).value});
  return form;
}

input.addEventListener("keypress",e=>{if(e.key==="Enter")act("send_message",{input:input.value})});
document.getElementById("sendButton").addEventListener("click",()=>act("send_message",{input:input.value}));
document.getElementById("openSettings").addEventListener("click",()=>act("open_settings",{},true));
document.getElementById("closeSettings").addEventListener("click",()=>act("close_settings"));
document.getElementById("saveSettings").addEventListener("click",()=>act("save_settings",{form:readForm()}));
document.getElementById("clearHistory").addEventListener("click",()=>act("clear_history"));
refresh();
</script>
</body>
</html>
"##;
